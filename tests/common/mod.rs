#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use elearn_server::{
    app_state::{AppState, Repositories},
    auth::hash_password,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{
        AttemptSummary, CompletionCounts, Material, Progress, QuestionAnswer, Quiz, QuizAttempt,
        QuizAttemptAnswer, QuizQuestion, Role, SubMaterial, User,
    },
    repositories::{
        AttemptTransaction, MaterialRepository, ProgressRepository, QuestionRepository,
        QuizAttemptRepository, QuizRepository, SubMaterialRepository, UserRepository,
    },
};

/// Step of the submission transaction that should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    InsertAttempt,
    AnswerKeys,
    InsertAnswers,
    Finalize,
    Commit,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    materials: Vec<Material>,
    sub_materials: Vec<SubMaterial>,
    progress: Vec<Progress>,
    quizzes: Vec<Quiz>,
    questions: Vec<QuizQuestion>,
    answers: Vec<QuestionAnswer>,
    attempts: Vec<QuizAttempt>,
    attempt_answers: Vec<QuizAttemptAnswer>,
}

/// In-memory stand-in for every collection. Vectors keep insertion order.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    fail_at: Arc<RwLock<Option<FailPoint>>>,
}

fn replace<T: Clone>(rows: &mut [T], item: &T, same: impl Fn(&T) -> bool, what: &str) -> AppResult<()> {
    match rows.iter_mut().find(|row| same(row)) {
        Some(row) => {
            *row = item.clone();
            Ok(())
        }
        None => Err(AppError::NotFound(format!("{} not found", what))),
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(&self) -> Repositories {
        let store = Arc::new(self.clone());
        Repositories {
            users: store.clone(),
            materials: store.clone(),
            sub_materials: store.clone(),
            progress: store.clone(),
            quizzes: store.clone(),
            questions: store.clone(),
            attempts: store,
        }
    }

    pub async fn fail_at(&self, point: Option<FailPoint>) {
        *self.fail_at.write().await = point;
    }

    pub async fn attempt_count(&self) -> usize {
        self.tables.read().await.attempts.len()
    }

    pub async fn attempt_answers(&self) -> Vec<QuizAttemptAnswer> {
        self.tables.read().await.attempt_answers.clone()
    }

    pub async fn attempts(&self) -> Vec<QuizAttempt> {
        self.tables.read().await.attempts.clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if user.is_active
            && tables
                .users
                .iter()
                .any(|u| u.is_active && u.username == user.username)
        {
            return Err(AppError::AlreadyExists("duplicate username".to_string()));
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id && u.is_active).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.username == username && u.is_active)
            .cloned())
    }

    async fn username_taken(&self, username: &str, exclude_id: Option<String>) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().any(|u| {
            u.is_active && u.username == username && Some(&u.id) != exclude_id.as_ref()
        }))
    }

    async fn find_all(&self, role: Option<Role>) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| u.is_active && role.map_or(true, |r| u.role == r))
            .cloned()
            .collect())
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        replace(&mut tables.users, &user, |u| u.id == user.id, "User")?;
        Ok(user)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl MaterialRepository for InMemoryStore {
    async fn create(&self, material: Material) -> AppResult<Material> {
        self.tables.write().await.materials.push(material.clone());
        Ok(material)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Material>> {
        let tables = self.tables.read().await;
        Ok(tables
            .materials
            .iter()
            .find(|m| m.id == id && !m.is_deleted)
            .cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Material>> {
        let tables = self.tables.read().await;
        Ok(tables.materials.iter().filter(|m| !m.is_deleted).cloned().collect())
    }

    async fn update(&self, material: Material) -> AppResult<Material> {
        let mut tables = self.tables.write().await;
        replace(&mut tables.materials, &material, |m| m.id == material.id, "Material")?;
        Ok(material)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl SubMaterialRepository for InMemoryStore {
    async fn create(&self, sub_material: SubMaterial) -> AppResult<SubMaterial> {
        self.tables.write().await.sub_materials.push(sub_material.clone());
        Ok(sub_material)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<SubMaterial>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sub_materials
            .iter()
            .find(|s| s.id == id && !s.is_deleted)
            .cloned())
    }

    async fn find_by_material(&self, material_id: &str) -> AppResult<Vec<SubMaterial>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sub_materials
            .iter()
            .filter(|s| s.material_id == material_id && !s.is_deleted)
            .cloned()
            .collect())
    }

    async fn update(&self, sub_material: SubMaterial) -> AppResult<SubMaterial> {
        let mut tables = self.tables.write().await;
        replace(
            &mut tables.sub_materials,
            &sub_material,
            |s| s.id == sub_material.id,
            "Sub-material",
        )?;
        Ok(sub_material)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryStore {
    async fn create(&self, progress: Progress) -> AppResult<Progress> {
        let mut tables = self.tables.write().await;
        if tables.progress.iter().any(|p| {
            p.student_id == progress.student_id && p.sub_material_id == progress.sub_material_id
        }) {
            return Err(AppError::AlreadyExists("duplicate progress".to_string()));
        }
        tables.progress.push(progress.clone());
        Ok(progress)
    }

    async fn find(&self, student_id: &str, sub_material_id: &str) -> AppResult<Option<Progress>> {
        let tables = self.tables.read().await;
        Ok(tables
            .progress
            .iter()
            .find(|p| p.student_id == student_id && p.sub_material_id == sub_material_id)
            .cloned())
    }

    async fn completed_sub_material_ids(&self, student_id: &str) -> AppResult<Vec<String>> {
        let tables = self.tables.read().await;
        Ok(tables
            .progress
            .iter()
            .filter(|p| p.student_id == student_id)
            .map(|p| p.sub_material_id.clone())
            .collect())
    }

    async fn completion_counts(&self, student_id: &str) -> AppResult<CompletionCounts> {
        let tables = self.tables.read().await;
        let live: Vec<&SubMaterial> = tables
            .sub_materials
            .iter()
            .filter(|s| !s.is_deleted)
            .filter(|s| {
                tables
                    .materials
                    .iter()
                    .any(|m| m.id == s.material_id && !m.is_deleted)
            })
            .collect();
        let done = live
            .iter()
            .filter(|s| {
                tables
                    .progress
                    .iter()
                    .any(|p| p.student_id == student_id && p.sub_material_id == s.id)
            })
            .count();

        Ok(CompletionCounts {
            done: done as i64,
            total: live.len() as i64,
        })
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for InMemoryStore {
    async fn find_current(&self) -> AppResult<Option<Quiz>> {
        let tables = self.tables.read().await;
        Ok(tables.quizzes.iter().find(|q| !q.is_deleted).cloned())
    }

    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.tables.write().await.quizzes.push(quiz.clone());
        Ok(quiz)
    }

    async fn update(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut tables = self.tables.write().await;
        replace(&mut tables.quizzes, &quiz, |q| q.id == quiz.id, "Quiz")?;
        Ok(quiz)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryStore {
    async fn create_with_answers(
        &self,
        question: QuizQuestion,
        answers: Vec<QuestionAnswer>,
    ) -> AppResult<(QuizQuestion, Vec<QuestionAnswer>)> {
        let mut tables = self.tables.write().await;
        tables.questions.push(question.clone());
        tables.answers.extend(answers.iter().cloned());
        Ok((question, answers))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizQuestion>> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .find(|q| q.id == id && !q.is_deleted)
            .cloned())
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizQuestion>> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .iter()
            .filter(|q| q.quiz_id == quiz_id && !q.is_deleted)
            .cloned()
            .collect())
    }

    async fn update(&self, question: QuizQuestion) -> AppResult<QuizQuestion> {
        let mut tables = self.tables.write().await;
        replace(&mut tables.questions, &question, |q| q.id == question.id, "Question")?;
        Ok(question)
    }

    async fn find_answers(&self, question_ids: &[String]) -> AppResult<Vec<QuestionAnswer>> {
        let tables = self.tables.read().await;
        Ok(tables
            .answers
            .iter()
            .filter(|a| !a.is_deleted && question_ids.contains(&a.question_id))
            .cloned()
            .collect())
    }

    async fn find_answer(&self, id: &str) -> AppResult<Option<QuestionAnswer>> {
        let tables = self.tables.read().await;
        Ok(tables
            .answers
            .iter()
            .find(|a| a.id == id && !a.is_deleted)
            .cloned())
    }

    async fn update_answer(&self, answer: QuestionAnswer) -> AppResult<QuestionAnswer> {
        let mut tables = self.tables.write().await;
        replace(&mut tables.answers, &answer, |a| a.id == answer.id, "Answer")?;
        Ok(answer)
    }

    async fn update_answers(&self, answers: Vec<QuestionAnswer>) -> AppResult<Vec<QuestionAnswer>> {
        let mut tables = self.tables.write().await;
        if let Some(missing) = answers
            .iter()
            .find(|a| !tables.answers.iter().any(|row| row.id == a.id))
        {
            return Err(AppError::NotFound(format!("Answer '{}' not found", missing.id)));
        }
        for answer in &answers {
            replace(&mut tables.answers, answer, |a| a.id == answer.id, "Answer")?;
        }
        Ok(answers)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Buffers every write and applies them to the store only on commit.
pub struct InMemoryAttemptTransaction {
    store: InMemoryStore,
    fail_at: Option<FailPoint>,
    attempt: Option<QuizAttempt>,
    answers: Vec<QuizAttemptAnswer>,
}

impl InMemoryAttemptTransaction {
    fn check(&self, point: FailPoint) -> AppResult<()> {
        if self.fail_at == Some(point) {
            return Err(AppError::DatabaseError(format!("injected failure at {:?}", point)));
        }
        Ok(())
    }
}

#[async_trait]
impl AttemptTransaction for InMemoryAttemptTransaction {
    async fn insert_attempt(&mut self, attempt: &QuizAttempt) -> AppResult<()> {
        self.check(FailPoint::InsertAttempt)?;
        self.attempt = Some(attempt.clone());
        Ok(())
    }

    async fn answer_keys(&mut self, answer_ids: &[String]) -> AppResult<HashMap<String, bool>> {
        self.check(FailPoint::AnswerKeys)?;
        let tables = self.store.tables.read().await;
        Ok(tables
            .answers
            .iter()
            .filter(|a| answer_ids.contains(&a.id))
            .map(|a| (a.id.clone(), a.is_correct))
            .collect())
    }

    async fn insert_answers(&mut self, answers: &[QuizAttemptAnswer]) -> AppResult<()> {
        self.check(FailPoint::InsertAnswers)?;
        self.answers.extend(answers.iter().cloned());
        Ok(())
    }

    async fn finalize(&mut self, attempt: &QuizAttempt) -> AppResult<()> {
        self.check(FailPoint::Finalize)?;
        match &mut self.attempt {
            Some(pending) if pending.id == attempt.id => {
                *pending = attempt.clone();
                Ok(())
            }
            _ => Err(AppError::NotFound("Attempt not found".to_string())),
        }
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.check(FailPoint::Commit)?;
        let InMemoryAttemptTransaction {
            store,
            attempt,
            answers,
            ..
        } = *self;

        let mut tables = store.tables.write().await;
        if let Some(attempt) = attempt {
            tables.attempts.push(attempt);
        }
        tables.attempt_answers.extend(answers);
        Ok(())
    }

    async fn abort(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl QuizAttemptRepository for InMemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn AttemptTransaction>> {
        Ok(Box::new(InMemoryAttemptTransaction {
            store: self.clone(),
            fail_at: *self.fail_at.read().await,
            attempt: None,
            answers: Vec::new(),
        }))
    }

    async fn find_all_summaries(&self) -> AppResult<Vec<AttemptSummary>> {
        let tables = self.tables.read().await;
        Ok(tables
            .attempts
            .iter()
            .map(|a| AttemptSummary {
                id: a.id.clone(),
                student_id: a.student_id.clone(),
                student_name: tables
                    .users
                    .iter()
                    .find(|u| u.id == a.student_id)
                    .map(|u| u.nama.clone()),
                quiz_name: a.quiz_name.clone(),
                score: a.score,
                finished_at: a.finished_at,
            })
            .collect())
    }

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let tables = self.tables.read().await;
        Ok(tables
            .attempts
            .iter()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

pub fn test_state(store: &InMemoryStore) -> AppState {
    AppState::from_repositories(Config::test_config(), store.repositories())
}

pub const PASSWORD: &str = "rahasia123";

/// Inserts an active user whose password is [`PASSWORD`].
pub async fn seed_user(store: &InMemoryStore, nama: &str, username: &str, role: Role) -> User {
    let hash = hash_password(PASSWORD.to_string()).await.unwrap();
    UserRepository::create(store, User::new(nama, username, &hash, role))
        .await
        .unwrap()
}

pub async fn seed_quiz(store: &InMemoryStore, is_active: bool) -> Quiz {
    QuizRepository::create(store, Quiz::new("Kuis Akhir", "Evaluasi materi", 30, is_active))
        .await
        .unwrap()
}

/// One question whose answers come back in order; index `correct` is the right one.
pub async fn seed_question(
    store: &InMemoryStore,
    quiz: &Quiz,
    text: &str,
    correct: usize,
) -> (QuizQuestion, Vec<QuestionAnswer>) {
    let question = QuizQuestion::new(&quiz.id, text, None, "");
    let answers = (0..4)
        .map(|i| QuestionAnswer::new(&question.id, &format!("{} option {}", text, i), i == correct))
        .collect();
    store.create_with_answers(question, answers).await.unwrap()
}

use std::{collections::HashMap, sync::Arc};

use validator::Validate;

use crate::{
    auth::Principal,
    errors::{AppError, AppResult},
    models::{
        domain::{QuestionAnswer, Quiz, QuizQuestion, ANSWER_OPTION_COUNT},
        dto::{
            request::{
                AnswerInput, BulkAnswerUpdateRequest, CreateQuestionRequest, UpdateAnswerRequest,
                UpdateQuestionRequest, UpdateQuizRequest,
            },
            response::{
                AdminAnswerDto, AdminQuestionDto, AdminQuizDto, QuizDto, StudentQuestionDto,
                StudentQuizDto,
            },
        },
    },
    repositories::{QuestionRepository, QuizRepository},
    services::{
        progress_service::ProgressService,
        upload_service::{is_data_uri, UploadCategory, UploadService},
    },
};

/// Groups answers under their question, keeping each list in stored order.
fn group_answers(answers: Vec<QuestionAnswer>) -> HashMap<String, Vec<QuestionAnswer>> {
    let mut grouped: HashMap<String, Vec<QuestionAnswer>> = HashMap::new();
    for answer in answers {
        grouped
            .entry(answer.question_id.clone())
            .or_default()
            .push(answer);
    }
    grouped
}

fn check_answer_set(answers: &[AnswerInput]) -> AppResult<()> {
    if answers.len() != ANSWER_OPTION_COUNT {
        return Err(AppError::ValidationError(format!(
            "A question needs exactly {} answers",
            ANSWER_OPTION_COUNT
        )));
    }
    if answers.iter().filter(|a| a.is_correct).count() != 1 {
        return Err(AppError::ValidationError(
            "Exactly one answer must be marked correct".to_string(),
        ));
    }
    Ok(())
}

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    questions: Arc<dyn QuestionRepository>,
    progress: Arc<ProgressService>,
    uploads: Arc<UploadService>,
}

impl QuizService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        questions: Arc<dyn QuestionRepository>,
        progress: Arc<ProgressService>,
        uploads: Arc<UploadService>,
    ) -> Self {
        Self {
            quizzes,
            questions,
            progress,
            uploads,
        }
    }

    pub(crate) async fn current_quiz(&self) -> AppResult<Quiz> {
        self.quizzes
            .find_current()
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))
    }

    async fn find_question(&self, id: &str) -> AppResult<QuizQuestion> {
        self.questions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))
    }

    async fn find_answer(&self, id: &str) -> AppResult<QuestionAnswer> {
        self.questions
            .find_answer(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Answer with id '{}' not found", id)))
    }

    async fn questions_with_answers(
        &self,
        quiz_id: &str,
    ) -> AppResult<Vec<(QuizQuestion, Vec<QuestionAnswer>)>> {
        let questions = self.questions.find_by_quiz(quiz_id).await?;
        let ids: Vec<String> = questions.iter().map(|q| q.id.clone()).collect();
        let mut answers = group_answers(self.questions.find_answers(&ids).await?);

        Ok(questions
            .into_iter()
            .map(|question| {
                let options = answers.remove(&question.id).unwrap_or_default();
                (question, options)
            })
            .collect())
    }

    async fn resolve_photo(&self, photo: Option<String>) -> AppResult<Option<String>> {
        match photo {
            Some(photo) if photo.is_empty() => Ok(None),
            Some(photo) if is_data_uri(&photo) => Ok(Some(
                self.uploads.store(&photo, UploadCategory::Questions).await?,
            )),
            other => Ok(other),
        }
    }

    /// The progress gate is checked before the quiz is even looked up.
    pub async fn student_view(&self, principal: &Principal) -> AppResult<StudentQuizDto> {
        self.progress.ensure_quiz_unlocked(principal).await?;

        let quiz = self.current_quiz().await?;
        if !quiz.is_active {
            return Err(AppError::NotFound("Quiz is not active".to_string()));
        }

        let questions = self
            .questions_with_answers(&quiz.id)
            .await?
            .into_iter()
            .map(|(question, answers)| StudentQuestionDto::new(question, answers))
            .collect();

        Ok(StudentQuizDto {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            duration: quiz.duration,
            questions,
        })
    }

    pub async fn admin_view(&self) -> AppResult<AdminQuizDto> {
        let quiz = self.current_quiz().await?;
        let questions = self
            .questions_with_answers(&quiz.id)
            .await?
            .into_iter()
            .map(|(question, answers)| AdminQuestionDto::new(question, answers))
            .collect();

        Ok(AdminQuizDto {
            quiz: quiz.into(),
            questions,
        })
    }

    /// Partial update of the quiz; creates it from defaults when none exists yet.
    pub async fn update_quiz(&self, request: UpdateQuizRequest) -> AppResult<QuizDto> {
        request.validate()?;

        let (mut quiz, exists) = match self.quizzes.find_current().await? {
            Some(quiz) => (quiz, true),
            None => (Quiz::default(), false),
        };

        if let Some(title) = request.title {
            quiz.title = title;
        }
        if let Some(description) = request.description {
            quiz.description = description;
        }
        if let Some(duration) = request.duration {
            quiz.duration = duration;
        }
        if let Some(is_active) = request.is_active {
            quiz.is_active = is_active;
        }

        let saved = if exists {
            quiz.touch();
            self.quizzes.update(quiz).await?
        } else {
            log::info!("Creating quiz '{}'", quiz.title);
            self.quizzes.create(quiz).await?
        };

        log::info!("Quiz '{}' saved (active: {})", saved.id, saved.is_active);
        Ok(saved.into())
    }

    pub async fn list_questions(&self) -> AppResult<Vec<AdminQuestionDto>> {
        let quiz = self.current_quiz().await?;
        Ok(self
            .questions_with_answers(&quiz.id)
            .await?
            .into_iter()
            .map(|(question, answers)| AdminQuestionDto::new(question, answers))
            .collect())
    }

    pub async fn get_question(&self, id: &str) -> AppResult<AdminQuestionDto> {
        let question = self.find_question(id).await?;
        let answers = self.questions.find_answers(&[question.id.clone()]).await?;
        Ok(AdminQuestionDto::new(question, answers))
    }

    /// Creates a question with its answer options in one write. Without explicit
    /// answers, placeholder options are seeded.
    pub async fn create_question(
        &self,
        request: CreateQuestionRequest,
    ) -> AppResult<AdminQuestionDto> {
        request.validate()?;
        if let Some(answers) = &request.answers {
            check_answer_set(answers)?;
        }

        let quiz = self.current_quiz().await?;
        let photo = self.resolve_photo(request.photo).await?;
        let question = QuizQuestion::new(&quiz.id, &request.question, photo, &request.explanation);

        let answers = match request.answers {
            Some(inputs) => inputs
                .iter()
                .map(|input| QuestionAnswer::new(&question.id, &input.answer, input.is_correct))
                .collect(),
            None => QuestionAnswer::seed_for(&question.id),
        };

        let (question, answers) = self
            .questions
            .create_with_answers(question, answers)
            .await?;

        log::info!(
            "Created question '{}' with {} answers",
            question.id,
            answers.len()
        );
        Ok(AdminQuestionDto::new(question, answers))
    }

    pub async fn update_question(
        &self,
        id: &str,
        request: UpdateQuestionRequest,
    ) -> AppResult<AdminQuestionDto> {
        request.validate()?;
        let mut question = self.find_question(id).await?;

        if let Some(text) = request.question {
            question.question = text;
        }
        if let Some(explanation) = request.explanation {
            question.explanation = explanation;
        }
        if request.photo.is_some() {
            question.photo = self.resolve_photo(request.photo).await?;
        }

        question.touch();
        let question = self.questions.update(question).await?;
        let answers = self.questions.find_answers(&[question.id.clone()]).await?;
        Ok(AdminQuestionDto::new(question, answers))
    }

    /// Soft delete; attempts referencing the question stay intact.
    pub async fn delete_question(&self, id: &str) -> AppResult<()> {
        let mut question = self.find_question(id).await?;
        question.is_deleted = true;
        question.touch();
        self.questions.update(question).await?;

        log::info!("Soft-deleted question '{}'", id);
        Ok(())
    }

    pub async fn list_answers(&self, question_id: &str) -> AppResult<Vec<AdminAnswerDto>> {
        let question = self.find_question(question_id).await?;
        let answers = self.questions.find_answers(&[question.id]).await?;
        Ok(answers.into_iter().map(AdminAnswerDto::from).collect())
    }

    pub async fn update_answer(
        &self,
        id: &str,
        request: UpdateAnswerRequest,
    ) -> AppResult<AdminAnswerDto> {
        request.validate()?;
        let mut answer = self.find_answer(id).await?;

        if let Some(text) = request.answer {
            answer.answer = text;
        }
        if let Some(is_correct) = request.is_correct {
            answer.is_correct = is_correct;
        }

        answer.touch();
        Ok(self.questions.update_answer(answer).await?.into())
    }

    pub async fn delete_answer(&self, id: &str) -> AppResult<()> {
        let mut answer = self.find_answer(id).await?;
        answer.is_deleted = true;
        answer.touch();
        self.questions.update_answer(answer).await?;

        log::info!("Soft-deleted answer '{}'", id);
        Ok(())
    }

    /// Rewrites the full option set of a question. Every item must name one of
    /// the question's current answers and the option count is fixed.
    pub async fn bulk_update_answers(
        &self,
        question_id: &str,
        request: BulkAnswerUpdateRequest,
    ) -> AppResult<Vec<AdminAnswerDto>> {
        request.validate()?;
        if request.answers.len() != ANSWER_OPTION_COUNT {
            return Err(AppError::ValidationError(format!(
                "Exactly {} answers are required",
                ANSWER_OPTION_COUNT
            )));
        }

        let question = self.find_question(question_id).await?;
        let mut current: HashMap<String, QuestionAnswer> = self
            .questions
            .find_answers(&[question.id.clone()])
            .await?
            .into_iter()
            .map(|answer| (answer.id.clone(), answer))
            .collect();

        let mut updated = Vec::with_capacity(request.answers.len());
        for item in request.answers {
            let mut answer = current.remove(&item.id).ok_or_else(|| {
                AppError::ValidationError(format!(
                    "Answer '{}' does not belong to question '{}'",
                    item.id, question.id
                ))
            })?;
            answer.answer = item.answer;
            answer.is_correct = item.is_correct;
            answer.touch();
            updated.push(answer);
        }

        let saved = self.questions.update_answers(updated).await?;
        log::info!("Updated answers of question '{}'", question.id);
        Ok(saved.into_iter().map(AdminAnswerDto::from).collect())
    }
}

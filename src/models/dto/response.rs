use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{
    AttemptSummary, CompletionCounts, ContentCategory, Material, Progress, QuestionAnswer, Quiz,
    QuizAttempt, QuizQuestion, Role, SubMaterial, User,
};

/// Success envelope shared by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginUser {
    pub id: String,
    pub nama: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub access_token: String,
    pub token_type: String,
    pub user: LoginUser,
    pub redirect_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub nama: String,
    pub username: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            nama: user.nama,
            username: user.username,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Material> for MaterialDto {
    fn from(material: Material) -> Self {
        MaterialDto {
            id: material.id,
            title: material.title,
            description: material.description,
            created_at: material.created_at,
            updated_at: material.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubMaterialDto {
    pub id: String,
    pub material_id: String,
    pub title: String,
    pub category: ContentCategory,
    pub content: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubMaterial> for SubMaterialDto {
    fn from(sub: SubMaterial) -> Self {
        SubMaterialDto {
            id: sub.id,
            material_id: sub.material_id,
            title: sub.title,
            category: sub.category,
            content: sub.content,
            description: sub.description,
            created_at: sub.created_at,
            updated_at: sub.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDetailDto {
    #[serde(flatten)]
    pub material: MaterialDto,
    pub sub_materials: Vec<SubMaterialDto>,
}

/// Sub-material as a student sees it, with their own completion flag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSubMaterialDto {
    #[serde(flatten)]
    pub sub_material: SubMaterialDto,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentMaterialDetailDto {
    #[serde(flatten)]
    pub material: MaterialDto,
    pub sub_materials: Vec<StudentSubMaterialDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDto {
    pub id: String,
    pub sub_material_id: String,
    pub completed_at: DateTime<Utc>,
}

impl From<Progress> for ProgressDto {
    fn from(progress: Progress) -> Self {
        ProgressDto {
            id: progress.id,
            sub_material_id: progress.sub_material_id,
            completed_at: progress.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummaryDto {
    pub done: i64,
    pub total: i64,
    pub completed: bool,
}

impl From<CompletionCounts> for ProgressSummaryDto {
    fn from(counts: CompletionCounts) -> Self {
        ProgressSummaryDto {
            done: counts.done,
            total: counts.total,
            completed: counts.is_complete(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAnswerDto {
    pub id: String,
    pub answer: String,
    pub is_correct: bool,
}

impl From<QuestionAnswer> for AdminAnswerDto {
    fn from(answer: QuestionAnswer) -> Self {
        AdminAnswerDto {
            id: answer.id,
            answer: answer.answer,
            is_correct: answer.is_correct,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminQuestionDto {
    pub id: String,
    pub question: String,
    pub photo: Option<String>,
    pub explanation: String,
    pub answers: Vec<AdminAnswerDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminQuestionDto {
    pub fn new(question: QuizQuestion, answers: Vec<QuestionAnswer>) -> Self {
        AdminQuestionDto {
            id: question.id,
            question: question.question,
            photo: question.photo,
            explanation: question.explanation,
            answers: answers.into_iter().map(AdminAnswerDto::from).collect(),
            created_at: question.created_at,
            updated_at: question.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Quiz> for QuizDto {
    fn from(quiz: Quiz) -> Self {
        QuizDto {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            duration: quiz.duration,
            is_active: quiz.is_active,
            created_at: quiz.created_at,
            updated_at: quiz.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminQuizDto {
    #[serde(flatten)]
    pub quiz: QuizDto,
    pub questions: Vec<AdminQuestionDto>,
}

/// Answer option shown to students. Has no correctness field by construction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAnswerDto {
    pub id: String,
    pub answer: String,
}

impl From<QuestionAnswer> for StudentAnswerDto {
    fn from(answer: QuestionAnswer) -> Self {
        StudentAnswerDto {
            id: answer.id,
            answer: answer.answer,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentQuestionDto {
    pub id: String,
    pub question: String,
    pub photo: Option<String>,
    pub answers: Vec<StudentAnswerDto>,
}

impl StudentQuestionDto {
    pub fn new(question: QuizQuestion, answers: Vec<QuestionAnswer>) -> Self {
        StudentQuestionDto {
            id: question.id,
            question: question.question,
            photo: question.photo,
            answers: answers.into_iter().map(StudentAnswerDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentQuizDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub questions: Vec<StudentQuestionDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizResponse {
    pub id: String,
    pub score: i32,
    pub finished_at: Option<DateTime<Utc>>,
}

impl From<QuizAttempt> for SubmitQuizResponse {
    fn from(attempt: QuizAttempt) -> Self {
        SubmitQuizResponse {
            id: attempt.id,
            score: attempt.score,
            finished_at: attempt.finished_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResultDto {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub quiz_name: String,
    pub score: i32,
    pub finished_at: Option<DateTime<Utc>>,
}

impl From<AttemptSummary> for AttemptResultDto {
    fn from(summary: AttemptSummary) -> Self {
        AttemptResultDto {
            id: summary.id,
            student_id: summary.student_id,
            student_name: summary.student_name.unwrap_or_default(),
            quiz_name: summary.quiz_name,
            score: summary.score,
            finished_at: summary.finished_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttemptDto {
    pub id: String,
    pub quiz_name: String,
    pub quiz_description: String,
    pub score: i32,
    pub finished_at: Option<DateTime<Utc>>,
}

impl From<QuizAttempt> for StudentAttemptDto {
    fn from(attempt: QuizAttempt) -> Self {
        StudentAttemptDto {
            id: attempt.id,
            quiz_name: attempt.quiz_name,
            quiz_description: attempt.quiz_description,
            score: attempt.score,
            finished_at: attempt.finished_at,
        }
    }
}

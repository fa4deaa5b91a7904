use serde::Deserialize;
use validator::Validate;

use crate::models::domain::{ContentCategory, Role};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 3, message = "username must be at least 3 characters"))]
    pub username: String,

    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub nama: String,

    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,

    pub role: Role,
}

/// Role is not editable once an account exists. Deactivation goes through
/// `DELETE /admin/users/{id}` and is final.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub nama: Option<String>,

    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,

    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMaterialRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMaterialRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,
}

/// `content` is an http(s) link, or a base64 data URI for photo uploads.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSubMaterialRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    pub category: ContentCategory,

    #[validate(length(min = 1))]
    pub content: String,

    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSubMaterialRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    pub category: Option<ContentCategory>,

    #[validate(length(min = 1))]
    pub content: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 600))]
    pub duration: Option<i32>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    #[validate(length(min = 1, max = 1000))]
    pub answer: String,

    #[serde(default)]
    pub is_correct: bool,
}

/// Without `answers` the question is seeded with placeholder options.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 5000))]
    pub question: String,

    pub photo: Option<String>, // data URI

    #[serde(default)]
    #[validate(length(max = 5000))]
    pub explanation: String,

    #[validate(nested)]
    pub answers: Option<Vec<AnswerInput>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 5000))]
    pub question: Option<String>,

    pub photo: Option<String>, // data URI

    #[validate(length(max = 5000))]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnswerRequest {
    #[validate(length(min = 1, max = 1000))]
    pub answer: Option<String>,

    pub is_correct: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkAnswerItem {
    #[validate(length(min = 1))]
    pub id: String,

    #[validate(length(min = 1, max = 1000))]
    pub answer: String,

    pub is_correct: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkAnswerUpdateRequest {
    #[validate(nested)]
    pub answers: Vec<BulkAnswerItem>,
}

/// One `{questionId, answerId?}` pair; a missing `answerId` means unanswered.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    #[validate(length(min = 1))]
    pub question_id: String,

    #[serde(default)]
    pub answer_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitQuizRequest {
    #[validate(nested)]
    pub result: Vec<SubmittedAnswer>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_valid_login_request() {
        let request = LoginRequest {
            username: "guru01".to_string(),
            password: "rahasia".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_login_rejects_short_fields() {
        let request = LoginRequest {
            username: "ab".to_string(),
            password: "12345".to_string(),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_create_user_requires_known_role() {
        let json = r#"{"nama":"Budi","username":"budi","password":"secret1","role":"admin"}"#;
        assert!(serde_json::from_str::<CreateUserRequest>(json).is_err());

        let json = r#"{"nama":"Budi","username":"budi","password":"secret1","role":"student"}"#;
        let request: CreateUserRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.role, Role::Student);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_submit_request_accepts_missing_answer_id() {
        let json = r#"{"result":[{"questionId":"q1","answerId":"a1"},{"questionId":"q2"}]}"#;
        let request: SubmitQuizRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.result.len(), 2);
        assert_eq!(request.result[0].answer_id.as_deref(), Some("a1"));
        assert!(request.result[1].answer_id.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_submit_request_rejects_blank_question_id() {
        let request = SubmitQuizRequest {
            result: vec![SubmittedAnswer {
                question_id: String::new(),
                answer_id: None,
            }],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_quiz_duration_range() {
        let request = UpdateQuizRequest {
            duration: Some(0),
            ..Default::default()
        };
        assert!(request.validate().is_err());

        let request = UpdateQuizRequest {
            duration: Some(90),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_nested_answer_validation() {
        let request = CreateQuestionRequest {
            question: "Ibu kota Indonesia?".to_string(),
            photo: None,
            explanation: String::new(),
            answers: Some(vec![AnswerInput {
                answer: String::new(),
                is_correct: true,
            }]),
        };
        assert!(request.validate().is_err());
    }
}

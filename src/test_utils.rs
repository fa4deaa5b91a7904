pub mod fixtures {
    use crate::{auth::Principal, models::domain::Role};

    pub fn principal(id: &str, role: Role) -> Principal {
        Principal {
            id: id.to_string(),
            username: format!("{}-name", id),
            role,
        }
    }

    pub fn student() -> Principal {
        principal("student-1", Role::Student)
    }

    pub fn teacher() -> Principal {
        principal("teacher-1", Role::Teacher)
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::test_helpers::*;
    use crate::models::domain::Role;
    use actix_web::http::StatusCode;

    #[test]
    fn test_fixture_roles() {
        assert_eq!(student().role, Role::Student);
        assert_eq!(teacher().role, Role::Teacher);
        assert_ne!(student().id, teacher().id);
    }

    #[test]
    fn test_status_helpers() {
        assert_success_status(StatusCode::CREATED);
        assert_error_status(StatusCode::FORBIDDEN);
    }
}

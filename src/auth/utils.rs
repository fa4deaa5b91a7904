use crate::{
    auth::Principal,
    errors::{AppError, AppResult},
    models::domain::Role,
};

pub fn require_role(principal: &Principal, allowed: &[Role]) -> AppResult<()> {
    if !allowed.contains(&principal.role) {
        return Err(AppError::Forbidden(format!(
            "Role '{}' cannot access this resource",
            principal.role
        )));
    }
    Ok(())
}

use crate::{error::AppError, models::user::Role};

/// Admins satisfy every requirement; users only `Role::User`.
pub fn require_role(actual: Role, required: Role) -> Result<(), AppError> {
    match (actual, required) {
        (Role::Admin, _) | (Role::User, Role::User) => Ok(()),
        (Role::User, Role::Admin) => Err(AppError::Forbidden(
            "Forbidden: admin role required".to_string(),
        )),
    }
}

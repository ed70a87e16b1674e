use crate::auth::password;
use crate::error::AppError;
use crate::models::User;
use crate::store::AuthStore;

/// Validate an email/password pair against the store.
///
/// Both failure branches return the same `InvalidCredentials` error so a
/// caller cannot tell "no such email" from "wrong password"; the lookup
/// miss additionally burns a dummy verification to keep its timing in
/// line with the mismatch path.
pub async fn validate(
    store: &dyn AuthStore,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = store.find_user_by_email(email).await?;

    let Some(user) = user else {
        password::verify_dummy(password);
        return Err(AppError::InvalidCredentials);
    };

    let valid = password::verify(password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    Ok(user)
}

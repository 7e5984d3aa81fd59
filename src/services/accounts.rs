use crate::auth::password::{
    hash_password, is_valid_email, normalize_email, validate_password_strength, verify_password,
};
use crate::database::models::{NewUser, ProfileUpdate, User};
use crate::database::Database;
use crate::error::ApiError;
use crate::types::Role;

/// Validated input for a new account
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub last_name: String,
    pub first_name: String,
    pub company: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub gdpr_accepted: bool,
    pub terms_accepted: bool,
}

pub async fn register(db: &Database, registration: Registration) -> Result<User, ApiError> {
    let email = normalize_email(&registration.email);
    if !is_valid_email(&email) {
        return Err(ApiError::field_error("email", "Invalid email format"));
    }
    validate_password_strength(&registration.password)?;

    let last_name = required(&registration.last_name, "last_name")?;
    let first_name = required(&registration.first_name, "first_name")?;

    if db.users().find_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }

    let new_user = NewUser {
        email,
        password_hash: hash_password(&registration.password)?,
        role: registration.role,
        last_name,
        first_name,
        company: optional(registration.company),
        address: optional(registration.address),
        phone: optional(registration.phone),
        gdpr_accepted: registration.gdpr_accepted,
        terms_accepted: registration.terms_accepted,
    };

    let user = db.users().create(&new_user).await?;
    tracing::info!(user_id = user.id, role = %user.role, "Registered new account");
    Ok(user)
}

/// Check credentials and the portal the caller claims to be using
pub async fn authenticate(db: &Database, email: &str, password: &str, claimed: Role) -> Result<User, ApiError> {
    let email = normalize_email(email);
    let Some(user) = db.users().find_by_email(&email).await? else {
        tracing::warn!("Login attempt for unknown account");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !verify_password(password, &user.password_hash) {
        tracing::warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    if user.role != claimed {
        tracing::warn!(user_id = user.id, role = %user.role, claimed = %claimed, "Login through the wrong portal");
        return Err(ApiError::role_mismatch(format!(
            "This account is registered as {}. Please use the {} login.",
            user.role, user.role
        )));
    }

    db.users().touch_last_login(user.id).await?;
    Ok(db.users().select_404(user.id).await?)
}

/// Apply a partial profile update. Blank required names are rejected.
pub async fn update_profile(db: &Database, user_id: i64, mut update: ProfileUpdate) -> Result<User, ApiError> {
    if let Some(email) = update.email.take() {
        let email = normalize_email(&email);
        if !is_valid_email(&email) {
            return Err(ApiError::field_error("email", "Invalid email format"));
        }
        if db.users().email_taken(&email, user_id).await? {
            return Err(ApiError::conflict("Email already in use by another account"));
        }
        update.email = Some(email);
    }

    update.last_name = update.last_name.map(|v| required(&v, "last_name")).transpose()?;
    update.first_name = update.first_name.map(|v| required(&v, "first_name")).transpose()?;
    update.company = update.company.map(|v| v.trim().to_string());
    update.address = update.address.map(|v| v.trim().to_string());
    update.phone = update.phone.map(|v| v.trim().to_string());

    Ok(db.users().update_profile(user_id, &update).await?)
}

pub async fn change_password(db: &Database, user_id: i64, current: &str, new: &str) -> Result<(), ApiError> {
    let user = db.users().select_404(user_id).await?;
    if !verify_password(current, &user.password_hash) {
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }
    validate_password_strength(new)?;

    db.users().update_password(user_id, &hash_password(new)?).await?;
    tracing::info!(user_id, "Password changed");
    Ok(())
}

fn required(value: &str, field: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::field_error(field, format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestContext, TEST_PASSWORD};

    fn registration(email: &str, role: Role) -> Registration {
        Registration {
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
            role,
            last_name: " Dupont ".to_string(),
            first_name: "Jean".to_string(),
            company: Some("  ".to_string()),
            address: None,
            phone: Some("0102030405".to_string()),
            gdpr_accepted: true,
            terms_accepted: true,
        }
    }

    #[tokio::test]
    async fn registers_with_normalized_fields() {
        let ctx = TestContext::new().await.unwrap();
        let user = register(&ctx.db, registration("  Jean.Dupont@Example.COM ", Role::Client)).await.unwrap();

        assert_eq!(user.email, "jean.dupont@example.com");
        assert_eq!(user.last_name, "Dupont");
        assert_eq!(user.company, None);
        assert_eq!(user.phone.as_deref(), Some("0102030405"));
        assert_ne!(user.password_hash, TEST_PASSWORD);
    }

    #[tokio::test]
    async fn register_rejects_bad_input_and_duplicates() {
        let ctx = TestContext::new().await.unwrap();

        let err = register(&ctx.db, registration("not-an-email", Role::Client)).await.unwrap_err();
        assert_eq!(err.status_code(), 400);

        let mut weak = registration("weak@example.com", Role::Client);
        weak.password = "password".to_string();
        assert_eq!(register(&ctx.db, weak).await.unwrap_err().status_code(), 400);

        let mut nameless = registration("nameless@example.com", Role::Client);
        nameless.first_name = "   ".to_string();
        assert_eq!(register(&ctx.db, nameless).await.unwrap_err().status_code(), 400);

        register(&ctx.db, registration("dup@example.com", Role::Client)).await.unwrap();
        let err = register(&ctx.db, registration("DUP@example.com", Role::Professional)).await.unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn authenticate_checks_password_then_role() {
        let ctx = TestContext::new().await.unwrap();
        let client = ctx.create_user("client@example.com", Role::Client).await.unwrap();

        let user = authenticate(&ctx.db, "CLIENT@example.com", TEST_PASSWORD, Role::Client).await.unwrap();
        assert_eq!(user.id, client.id);
        let stored = ctx.db.users().select_404(client.id).await.unwrap();
        assert!(stored.last_login_at.is_some());

        let err = authenticate(&ctx.db, "client@example.com", "Wrong1!xx", Role::Client).await.unwrap_err();
        assert_eq!(err.status_code(), 401);

        let err = authenticate(&ctx.db, "nobody@example.com", TEST_PASSWORD, Role::Client).await.unwrap_err();
        assert_eq!(err.status_code(), 401);

        let err = authenticate(&ctx.db, "client@example.com", TEST_PASSWORD, Role::Professional).await.unwrap_err();
        assert!(matches!(err, ApiError::RoleMismatch(_)));
    }

    #[tokio::test]
    async fn profile_update_guards_email_uniqueness() {
        let ctx = TestContext::new().await.unwrap();
        let a = ctx.create_user("a@example.com", Role::Client).await.unwrap();
        ctx.create_user("b@example.com", Role::Client).await.unwrap();

        let taken = ProfileUpdate { email: Some("B@example.com".into()), ..Default::default() };
        assert_eq!(update_profile(&ctx.db, a.id, taken).await.unwrap_err().status_code(), 409);

        let own = ProfileUpdate {
            email: Some("a@example.com".into()),
            company: Some(" Cabinet A ".into()),
            ..Default::default()
        };
        let updated = update_profile(&ctx.db, a.id, own).await.unwrap();
        assert_eq!(updated.company.as_deref(), Some("Cabinet A"));

        let blank = ProfileUpdate { last_name: Some(" ".into()), ..Default::default() };
        assert_eq!(update_profile(&ctx.db, a.id, blank).await.unwrap_err().status_code(), 400);
    }

    #[tokio::test]
    async fn change_password_requires_current_one() {
        let ctx = TestContext::new().await.unwrap();
        let user = ctx.create_user("pw@example.com", Role::Client).await.unwrap();

        let err = change_password(&ctx.db, user.id, "Nope1234!", "NewPass1!").await.unwrap_err();
        assert_eq!(err.status_code(), 401);

        let err = change_password(&ctx.db, user.id, TEST_PASSWORD, "short").await.unwrap_err();
        assert_eq!(err.status_code(), 400);

        change_password(&ctx.db, user.id, TEST_PASSWORD, "NewPass1!").await.unwrap();
        assert!(authenticate(&ctx.db, "pw@example.com", "NewPass1!", Role::Client).await.is_ok());
    }
}

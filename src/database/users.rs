use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, ProfileUpdate, User};

const DUPLICATE_EMAIL: &str = "Email already registered";

pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &NewUser) -> Result<User, DatabaseError> {
        let now = Utc::now().naive_utc();

        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, role, last_name, first_name, company, address, phone, \
             gdpr_accepted, terms_accepted, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.last_name)
        .bind(&user.first_name)
        .bind(&user.company)
        .bind(&user.address)
        .bind(&user.phone)
        .bind(user.gdpr_accepted)
        .bind(user.terms_accepted)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| DatabaseError::unique_or(e, DUPLICATE_EMAIL))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    pub async fn select_404(&self, id: i64) -> Result<User, DatabaseError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    /// True when another account already uses `email`
    pub async fn email_taken(&self, email: &str, except_id: i64) -> Result<bool, DatabaseError> {
        let taken: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ? AND id != ?")
            .bind(email)
            .bind(except_id)
            .fetch_optional(self.pool)
            .await?;
        Ok(taken.is_some())
    }

    pub async fn update_profile(&self, id: i64, update: &ProfileUpdate) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET \
             email = COALESCE(?, email), \
             last_name = COALESCE(?, last_name), \
             first_name = COALESCE(?, first_name), \
             company = COALESCE(?, company), \
             address = COALESCE(?, address), \
             phone = COALESCE(?, phone), \
             updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(&update.email)
        .bind(&update.last_name)
        .bind(&update.first_name)
        .bind(&update.company)
        .bind(&update.address)
        .bind(&update.phone)
        .bind(Utc::now().naive_utc())
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| DatabaseError::unique_or(e, DUPLICATE_EMAIL))?;

        user.ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    pub async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now().naive_utc())
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    pub async fn touch_last_login(&self, id: i64) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE users SET last_login_at = ? WHERE id = ?")
            .bind(Utc::now().naive_utc())
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}

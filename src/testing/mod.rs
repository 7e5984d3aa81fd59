use chrono::{NaiveDateTime, Utc};

use crate::auth::password::hash_password;
use crate::config::DatabaseConfig;
use crate::database::models::{Document, NewDocument, NewUser, User};
use crate::database::Database;
use crate::types::{DocumentStatus, Role};

pub const TEST_PASSWORD: &str = "Password1!";

/// Migrated in-memory database for unit tests
pub struct TestContext {
    pub db: Database,
}

impl TestContext {
    pub async fn new() -> anyhow::Result<Self> {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connect_timeout_secs: 5,
        };
        let db = Database::connect(&config).await?;
        db.migrate().await?;
        Ok(Self { db })
    }

    /// Insert payload with a name derived from the email's local part
    pub fn new_user(&self, email: &str, role: Role) -> NewUser {
        let local = email.split('@').next().unwrap_or(email);
        NewUser {
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hash test password"),
            role,
            last_name: capitalize(local),
            first_name: "Test".to_string(),
            company: None,
            address: None,
            phone: None,
            gdpr_accepted: true,
            terms_accepted: true,
        }
    }

    pub async fn create_user(&self, email: &str, role: Role) -> anyhow::Result<User> {
        let user = self.db.users().create(&self.new_user(email, role)).await?;
        Ok(user)
    }

    /// Insert a document row without touching disk. `uploaded_at` is "%Y-%m-%d %H:%M:%S".
    pub async fn insert_document(&self, user_id: i64, filename: &str, uploaded_at: &str) -> anyhow::Result<Document> {
        let uploaded_at = NaiveDateTime::parse_from_str(uploaded_at, "%Y-%m-%d %H:%M:%S")?;
        let doc = NewDocument {
            user_id,
            filename: filename.to_string(),
            original_name: filename.to_string(),
            filepath: format!("temp/{}", filename),
            mime_type: "application/octet-stream".to_string(),
            size_bytes: 0,
            uploaded_at,
        };
        Ok(self.db.documents().create(&doc).await?)
    }

    pub async fn set_status(&self, document_id: i64, status: DocumentStatus) -> anyhow::Result<()> {
        self.db.documents().update_status(document_id, status).await?;
        Ok(())
    }
}

/// Detached user value for tests that never hit the database
pub fn sample_user(id: i64, role: Role) -> User {
    let now = Utc::now().naive_utc();
    User {
        id,
        email: format!("user{}@example.com", id),
        password_hash: String::new(),
        role,
        last_name: "Martin".to_string(),
        first_name: "Élodie".to_string(),
        company: None,
        address: None,
        phone: None,
        gdpr_accepted: true,
        terms_accepted: true,
        created_at: now,
        updated_at: now,
        last_login_at: None,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Document, NewDocument};
use crate::database::query_builder;
use crate::filter::types::SqlResult;
use crate::types::DocumentStatus;

/// Base projection shared by every document read, owner profile included
pub const DOCUMENT_SELECT: &str = "SELECT d.id, d.user_id, d.filename, d.original_name, d.filepath, \
     d.mime_type, d.size_bytes, d.uploaded_at, d.status, \
     u.email AS owner_email, u.last_name AS owner_last_name, u.first_name AS owner_first_name \
     FROM documents d JOIN users u ON u.id = d.user_id";

/// Newest first; id breaks ties between uploads in the same instant
pub const DOCUMENT_ORDER: &str = "ORDER BY d.uploaded_at DESC, d.id DESC";

pub struct DocumentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DocumentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a freshly uploaded document. Status starts at the column default.
    pub async fn create(&self, doc: &NewDocument) -> Result<Document, DatabaseError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO documents (user_id, filename, original_name, filepath, mime_type, size_bytes, uploaded_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(doc.user_id)
        .bind(&doc.filename)
        .bind(&doc.original_name)
        .bind(&doc.filepath)
        .bind(&doc.mime_type)
        .bind(doc.size_bytes)
        .bind(doc.uploaded_at)
        .fetch_one(self.pool)
        .await?;

        self.select_404(id).await
    }

    pub async fn find(&self, id: i64) -> Result<Option<Document>, DatabaseError> {
        let query = format!("{} WHERE d.id = ?", DOCUMENT_SELECT);
        let doc = sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(doc)
    }

    pub async fn select_404(&self, id: i64) -> Result<Document, DatabaseError> {
        self.find(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Document not found".to_string()))
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Document>, DatabaseError> {
        let query = format!("{} WHERE d.user_id = ? {}", DOCUMENT_SELECT, DOCUMENT_ORDER);
        let docs = sqlx::query_as::<_, Document>(&query)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;
        Ok(docs)
    }

    pub async fn list_all(&self) -> Result<Vec<Document>, DatabaseError> {
        let query = format!("{} {}", DOCUMENT_SELECT, DOCUMENT_ORDER);
        let docs = sqlx::query_as::<_, Document>(&query)
            .fetch_all(self.pool)
            .await?;
        Ok(docs)
    }

    /// Run a statement produced by the document filter
    pub async fn select_any(&self, sql_result: &SqlResult) -> Result<Vec<Document>, DatabaseError> {
        query_builder::select_all::<Document>(self.pool, sql_result).await
    }

    pub async fn update_status(&self, id: i64, status: DocumentStatus) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE documents SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Document not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;
    use crate::types::Role;

    #[tokio::test]
    async fn new_documents_start_pending_with_owner_profile() {
        let ctx = TestContext::new().await.unwrap();
        let client = ctx.create_user("owner@example.com", Role::Client).await.unwrap();

        let doc = ctx.insert_document(client.id, "bilan.pdf", "2024-03-01 09:30:00").await.unwrap();

        assert_eq!(doc.status, DocumentStatus::Pending);
        assert_eq!(doc.owner.email, "owner@example.com");
        assert_eq!(doc.owner.last_name, client.last_name);
        assert_eq!(doc.upload_date().to_string(), "2024-03-01");
    }

    #[tokio::test]
    async fn lists_are_scoped_and_newest_first() {
        let ctx = TestContext::new().await.unwrap();
        let alice = ctx.create_user("alice@example.com", Role::Client).await.unwrap();
        let bob = ctx.create_user("bob@example.com", Role::Client).await.unwrap();

        ctx.insert_document(alice.id, "old.pdf", "2024-01-01 08:00:00").await.unwrap();
        ctx.insert_document(alice.id, "new.pdf", "2024-02-01 08:00:00").await.unwrap();
        ctx.insert_document(bob.id, "bob.pdf", "2024-01-15 08:00:00").await.unwrap();

        let mine = ctx.db.documents().list_for_user(alice.id).await.unwrap();
        let names: Vec<_> = mine.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, vec!["new.pdf", "old.pdf"]);

        let all = ctx.db.documents().list_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].filename, "bob.pdf");
    }

    #[tokio::test]
    async fn status_update_on_unknown_id_is_not_found() {
        let ctx = TestContext::new().await.unwrap();
        let err = ctx.db.documents().update_status(999, DocumentStatus::Urgent).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }

    #[tokio::test]
    async fn status_column_rejects_values_outside_the_enum() {
        let ctx = TestContext::new().await.unwrap();
        let client = ctx.create_user("check@example.com", Role::Client).await.unwrap();
        let doc = ctx.insert_document(client.id, "a.pdf", "2024-01-01 08:00:00").await.unwrap();

        let raw = sqlx::query("UPDATE documents SET status = 'archived' WHERE id = ?")
            .bind(doc.id)
            .execute(ctx.db.pool())
            .await;
        assert!(raw.is_err());
        assert_eq!(ctx.db.documents().select_404(doc.id).await.unwrap().status, DocumentStatus::Pending);
    }
}

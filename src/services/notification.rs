use askama::Template;
use thiserror::Error;

use crate::database::models::Document;
use crate::database::{Database, DatabaseError};
use crate::services::mailer::{EmailMessage, MailError, Mailer};
use crate::types::DocumentStatus;

#[derive(Template)]
#[template(path = "email/status_changed.html")]
struct StatusChangedHtml<'a> {
    subject: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    document_name: &'a str,
    status_text: &'a str,
    color: &'a str,
    uploaded_on: &'a str,
    portal_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/status_changed.txt")]
struct StatusChangedText<'a> {
    first_name: &'a str,
    last_name: &'a str,
    document_name: &'a str,
    status_text: &'a str,
    uploaded_on: &'a str,
    portal_url: &'a str,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification lookup failed: {0}")]
    Lookup(#[from] DatabaseError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

pub fn status_text(status: DocumentStatus) -> &'static str {
    match status {
        DocumentStatus::Processing => "being processed",
        DocumentStatus::Validated => "validated",
        DocumentStatus::Urgent => "marked as urgent",
        DocumentStatus::Pending => "updated",
    }
}

pub fn status_color(status: DocumentStatus) -> &'static str {
    match status {
        DocumentStatus::Validated => "#28a745",
        DocumentStatus::Urgent => "#dc3545",
        DocumentStatus::Processing => "#007bff",
        DocumentStatus::Pending => "#fd7e14",
    }
}

/// Build the message telling the document owner about its new status
pub fn compose_status_email(
    doc: &Document,
    status: DocumentStatus,
    portal_url: &str,
) -> Result<EmailMessage, MailError> {
    let text = status_text(status);
    let subject = format!("Your document \"{}\" has been {}", doc.original_name, text);
    let uploaded_on = doc.uploaded_at.format("%Y-%m-%d").to_string();

    let html_body = StatusChangedHtml {
        subject: &subject,
        first_name: &doc.owner.first_name,
        last_name: &doc.owner.last_name,
        document_name: &doc.original_name,
        status_text: text,
        color: status_color(status),
        uploaded_on: &uploaded_on,
        portal_url,
    }
    .render()?;

    let text_body = StatusChangedText {
        first_name: &doc.owner.first_name,
        last_name: &doc.owner.last_name,
        document_name: &doc.original_name,
        status_text: text,
        uploaded_on: &uploaded_on,
        portal_url,
    }
    .render()?;

    Ok(EmailMessage {
        to: doc.owner.email.clone(),
        subject,
        text_body,
        html_body,
    })
}

/// Look up the document and its owner, then send the status email
pub async fn notify_status_change(
    db: &Database,
    mailer: &dyn Mailer,
    portal_url: &str,
    document_id: i64,
    status: DocumentStatus,
) -> Result<String, NotifyError> {
    let doc = db.documents().select_404(document_id).await?;
    let message = compose_status_email(&doc, status, portal_url)?;
    let delivery_id = mailer.send(&message).await?;

    tracing::info!(document_id, status = %status, to = %message.to, delivery_id = %delivery_id, "Status notification sent");
    Ok(delivery_id)
}

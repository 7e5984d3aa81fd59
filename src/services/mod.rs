pub mod accounts;
pub mod mailer;
pub mod notification;

pub use mailer::{EmailMessage, MailError, Mailer, SimulatedMailer, SmtpMailer};
pub use notification::{notify_status_change, NotifyError};

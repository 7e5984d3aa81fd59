pub mod document;
pub mod user;

pub use document::{Document, DocumentOwner, NewDocument};
pub use user::{NewUser, ProfileUpdate, User};

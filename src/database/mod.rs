pub mod documents;
pub mod manager;
pub mod models;
pub mod query_builder;
pub mod users;

pub use documents::DocumentRepository;
pub use manager::{Database, DatabaseError};
pub use users::UserRepository;

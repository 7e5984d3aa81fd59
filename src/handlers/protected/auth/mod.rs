pub mod password;
pub mod profile;

// Re-export handler functions for use in routing
pub use password::change_password_put;
pub use profile::{profile_get, profile_put};

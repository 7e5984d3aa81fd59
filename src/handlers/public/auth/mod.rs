// handlers/public/auth/mod.rs - Public authentication handlers
//
// Account creation and token acquisition. No JWT required.

pub mod forgot_password; // POST /api/auth/forgot-password
pub mod login;           // POST /api/auth/login - authenticate and get JWT
pub mod register;        // POST /api/auth/register - create new account
pub mod utils;

pub use forgot_password::forgot_password_post;
pub use login::login_post;
pub use register::register_post;

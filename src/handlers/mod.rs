// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth). Professional-only operations are
// protected handlers that check the caller's role themselves.

pub mod public;    // Registration, login, password reset request
pub mod protected; // Everything behind a bearer token

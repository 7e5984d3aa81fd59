pub mod server;
pub mod uploads;
pub mod user;

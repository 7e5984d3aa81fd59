// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None
// Route Prefix: /api/auth/{register,login,forgot-password}

pub mod auth;

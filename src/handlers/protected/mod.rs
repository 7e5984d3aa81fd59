// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Security Level: JWT Authentication Required
// Route Prefix: /api/auth/{profile,change-password}, /api/docs/*
// Middleware: jwt_auth_middleware injects AuthUser; role checks happen per handler

pub mod auth; // Profile and password management
pub mod docs; // Upload, listing, filtering, file access, status changes

// handlers/protected/mod.rs - Protected handlers (session required)
//
// Security Level: session token (cookie or bearer)
// Middleware: require_session, which injects AuthUser

pub mod auth;
pub mod lms;
pub mod users;

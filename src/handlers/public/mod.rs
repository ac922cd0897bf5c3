// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None
// Middleware: none beyond the global layers

pub mod auth;
pub mod courses;
pub mod health;

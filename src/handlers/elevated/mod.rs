// handlers/elevated/mod.rs - Elevated handlers (admin role required)
//
// Security Level: session + role admin or super_admin
// Middleware: require_session, then require_admin

pub mod admin;

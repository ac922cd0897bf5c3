// handlers/mod.rs - HTTP handlers grouped by security level
//
// public/    no session (register, login, catalog, health)
// protected/ session required (profile, LMS)
// elevated/  session + admin role (catalog and curriculum authoring)

pub mod elevated;
pub mod protected;
pub mod public;

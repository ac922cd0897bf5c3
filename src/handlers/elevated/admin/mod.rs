// handlers/elevated/admin/mod.rs - /api/admin/*

pub mod courses;
pub mod curriculum;

pub mod extract;
pub mod requests;

pub use extract::{IdPath, ValidatedJson};

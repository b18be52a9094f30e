pub mod pacing;
pub mod session_store;
pub mod session_validator;

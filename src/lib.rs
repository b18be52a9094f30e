pub mod core;
pub mod engine;
pub mod extract;
pub mod features;
pub mod scraping;

// --- Primary core exports ---
pub use core::types;
pub use core::types::*;
pub use core::{ScoutConfig, ScoutError};

pub use engine::{AuthWallPolicy, ProfileScout};
pub use extract::SelectorTable;
pub use features::{pacing, session_store, session_validator};
pub use scraping::BrowsingPage;

pub mod browser_manager;
pub mod navigation;
pub mod page;
pub mod stealth;
pub mod synchronizer;

pub use page::BrowsingPage;

// Search surfaces and edit forms
// Per-form declarations and the normalization pipeline built on them

pub mod traits;

// Re-export commonly used items
pub use traits::{EditForm, SearchSurface};

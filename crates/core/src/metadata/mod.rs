//! Versioned listing-copy models: iteration history and field addressing.

mod history;
mod scope;

pub use history::*;
pub use scope::*;

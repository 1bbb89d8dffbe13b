//! Student & parent data explorer.
//!
//! The library holds the pure pipeline: load a sheet, normalize it once,
//! narrow it with cascading filters and summarize what is left. The desktop
//! shell in `main.rs` only renders what [`analysis::view::compute`] returns.

pub mod analysis;
pub mod data;

pub use analysis::view::{compute, ViewModel, ViewOptions};
pub use data::filter::FilterSelection;
pub use data::model::{Dataset, Table};

//! Analysis layer: everything computed from a filtered [`Dataset`].
//!
//! ```text
//!   filtered Dataset
//!        │
//!        ├──► aggregate   counts / means per city, level, class, bracket
//!        ├──► bracket     income → <1jt .. >10jt
//!        ├──► stats       mean, median, mode, std dev, histogram
//!        └──► tier        mean income → high / medium / low
//!        │
//!        ▼
//!   view::compute → ViewModel (what the report draws)
//! ```
//!
//! [`Dataset`]: crate::data::model::Dataset

pub mod aggregate;
pub mod bracket;
pub mod stats;
pub mod tier;
pub mod view;

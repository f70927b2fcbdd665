//! DSA-Core: Foundation types for the Daily and Sports Activities dataset
//!
//! Channel vocabulary, activity mapping, the flat recording table and the
//! dashboard selection model.

pub mod activity;
pub mod channels;
pub mod dataset;
pub mod error;
pub mod selection;

pub use activity::*;
pub use channels::*;
pub use dataset::*;
pub use error::{DsaError, DsaResult};
pub use selection::*;

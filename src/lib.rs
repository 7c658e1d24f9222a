//! Claims aggregation behind the CPT code financial dashboard.
//!
//! The [`data`] module holds the whole pipeline; the binaries only load a
//! table and display a [`data::view::DashboardView`].

pub mod data;
pub mod error;

pub use data::filter::ColumnMapping;
pub use data::model::ColumnTable;
pub use data::view::{DashboardView, Selection};
pub use error::{LoadError, ProcessingError};

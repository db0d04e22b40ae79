//! File-backed inputs and outputs for the estimate engine: the product
//! catalog CSV, TOML draft files, report rendering and logging setup.

pub mod catalog;
pub mod draft_file;
pub mod logging;
pub mod report;

pub use catalog::{CatalogLoader, CatalogLoaderError, ProductIndex, ProductRecord};
pub use draft_file::{DraftFile, DraftFileError};
pub use report::{Report, format_amount, render};

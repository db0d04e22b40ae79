//! Draft estimate editing.
//!
//! The operations an operator performs while building an estimate: adding
//! and removing sections and lines, seeding lines from the product catalog,
//! and turning the finished draft into a save payload.

mod editor;
mod payload;
mod templates;

use thiserror::Error;

use crate::models::SectionType;

pub use editor::EstimateDraft;
pub use payload::SavePayload;
pub use templates::template_lines;

/// Errors returned by draft editing operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("a {0} section is already in the estimate")]
    DuplicateSection(SectionType),

    #[error("the estimate has no {0} section")]
    SectionNotFound(SectionType),

    #[error("the {section_type} section has no line #{order}")]
    LineNotFound { section_type: SectionType, order: u32 },

    #[error("line #{order} of the {section_type} section is not linked to a catalog product")]
    NotAProductLine { section_type: SectionType, order: u32 },

    #[error("product {0} is not in the catalog")]
    ProductNotFound(i64),

    #[error("select a project before saving the estimate")]
    MissingProject,

    #[error("add at least one section before saving the estimate")]
    NoSections,
}

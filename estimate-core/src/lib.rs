pub mod calculations;
pub mod draft;
pub mod models;

pub use calculations::{
    CalculationWarning, EstimateCalculator, EstimateConfig, EstimateConfigError, EstimateResult,
    compute,
};
pub use draft::{DraftError, EstimateDraft, SavePayload};
pub use models::*;

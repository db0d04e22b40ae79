use serde::{Deserialize, Serialize};

use super::{DraftError, EstimateDraft};
use crate::calculations::EstimateCalculator;
use crate::models::{Section, SourceType};

/// Body of a create/update call to the persistence API.
///
/// Sections carry engine-resolved amounts and subtotals. The API stores each
/// save as a new estimate version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePayload {
    pub project_id: i64,
    pub title: Option<String>,
    pub receiver_name: Option<String>,
    pub memo: Option<String>,
    pub sections: Vec<Section>,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl EstimateDraft {
    /// Resolves the draft and builds the save payload from the result.
    ///
    /// Text fields are trimmed and empty ones omitted. A line keeps its
    /// `source_id` only while it is linked to a catalog product.
    ///
    /// # Errors
    ///
    /// - [`DraftError::MissingProject`] if no project is selected
    /// - [`DraftError::NoSections`] if the draft has no sections
    pub fn to_payload(
        &self,
        calculator: &EstimateCalculator,
    ) -> Result<SavePayload, DraftError> {
        let project_id = self.project_id.ok_or(DraftError::MissingProject)?;
        if self.sections.is_empty() {
            return Err(DraftError::NoSections);
        }

        let mut sections = self.compute(calculator).sections;
        for line in sections.iter_mut().flat_map(|section| section.lines.iter_mut()) {
            line.spec = line.spec.as_deref().and_then(non_empty);
            line.remark = line.remark.as_deref().and_then(non_empty);
            if line.source_type != SourceType::Product {
                line.source_id = None;
            }
        }

        Ok(SavePayload {
            project_id,
            title: non_empty(&self.title),
            receiver_name: non_empty(&self.receiver_name),
            memo: non_empty(&self.memo),
            sections,
        })
    }
}

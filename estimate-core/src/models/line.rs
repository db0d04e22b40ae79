use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::coerce::{decimal_or_zero, optional_decimal, optional_section_type};
use super::{CalcMode, PriceType, SectionType, SourceType};

/// One billable row of a section.
///
/// `amount` is derived: the engine recomputes it on every run and never reads
/// the incoming value. For [`CalcMode::PercentOfSubtotal`] lines `quantity`
/// holds the percentage (3.7 means 3.7%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    #[serde(rename = "line_order")]
    pub order: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub spec: Option<String>,
    #[serde(default)]
    pub unit: String,
    #[serde(rename = "qty", default, deserialize_with = "decimal_or_zero")]
    pub quantity: Decimal,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub unit_price: Option<Decimal>,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub calc_mode: CalcMode,
    #[serde(default, deserialize_with = "optional_section_type")]
    pub base_section_type: Option<SectionType>,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default)]
    pub source_id: Option<i64>,
    #[serde(default)]
    pub price_type: Option<PriceType>,
}

impl Line {
    /// A blank priced line, as added by the "add line" action.
    pub fn normal(
        name: impl Into<String>,
        unit: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            order: 0,
            name: name.into(),
            spec: None,
            unit: unit.into(),
            quantity,
            unit_price: Some(unit_price),
            amount: None,
            remark: None,
            calc_mode: CalcMode::Normal,
            base_section_type: None,
            formula: None,
            source_type: SourceType::None,
            source_id: None,
            price_type: None,
        }
    }

    /// A line worth `percent` percent of the `base` section's subtotal.
    pub fn percent_of(
        name: impl Into<String>,
        base: SectionType,
        percent: Decimal,
    ) -> Self {
        Self {
            unit_price: None,
            calc_mode: CalcMode::PercentOfSubtotal,
            base_section_type: Some(base),
            ..Self::normal(name, "%", percent, Decimal::ZERO)
        }
    }

    /// A line whose amount is resolved from a formula string.
    pub fn formula(
        name: impl Into<String>,
        formula: impl Into<String>,
        percent: Decimal,
    ) -> Self {
        Self {
            unit_price: None,
            calc_mode: CalcMode::Formula,
            formula: Some(formula.into()),
            ..Self::normal(name, "%", percent, Decimal::ZERO)
        }
    }

    pub fn with_spec(
        mut self,
        spec: impl Into<String>,
    ) -> Self {
        self.spec = Some(spec.into());
        self
    }

    /// Resolved amount, with unresolved lines counting as zero.
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }
}

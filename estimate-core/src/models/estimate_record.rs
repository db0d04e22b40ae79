use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Section;
use super::coerce::decimal_or_zero;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessState {
    Ongoing,
    Done,
    Canceled,
}

/// A saved estimate version as returned by the persistence API.
///
/// Saving an edited estimate creates a new version; this type is only read
/// back to seed an edit draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRecord {
    pub id: i64,
    #[serde(default)]
    pub version_no: Option<i32>,
    pub project_id: i64,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub receiver_name: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub issue_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub business_state: Option<BusinessState>,

    // Totals as stored at save time
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub subtotal: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub tax: Decimal,
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total: Decimal,

    #[serde(default)]
    pub sections: Vec<Section>,
}

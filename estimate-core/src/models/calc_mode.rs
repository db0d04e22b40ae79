use serde::{Deserialize, Serialize};

/// Rule that derives a line's amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalcMode {
    /// `quantity × unit_price`.
    #[default]
    Normal,
    /// `quantity` percent of another section's subtotal.
    PercentOfSubtotal,
    /// Cross-section aggregate described by the line's formula string.
    Formula,
}

/// Where a line's description and price were seeded from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    Product,
    LaborItem,
    #[default]
    None,
}

/// Which catalog price column seeds a product line's unit price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceType {
    #[default]
    Design,
    Consumer,
    Supply,
    /// Price typed by the user; never re-read from the catalog.
    Manual,
}

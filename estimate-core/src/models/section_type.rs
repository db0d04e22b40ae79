use std::fmt;

use serde::{Deserialize, Serialize};

/// Cost category of an estimate section.
///
/// An estimate holds at most one section per type; the variants are listed
/// here in the canonical order used for subtotal reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionType {
    Material,
    Labor,
    Expense,
    Overhead,
    Profit,
    Manual,
}

impl SectionType {
    pub const ALL: [SectionType; 6] = [
        Self::Material,
        Self::Labor,
        Self::Expense,
        Self::Overhead,
        Self::Profit,
        Self::Manual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Material => "MATERIAL",
            Self::Labor => "LABOR",
            Self::Expense => "EXPENSE",
            Self::Overhead => "OVERHEAD",
            Self::Profit => "PROFIT",
            Self::Manual => "MANUAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MATERIAL" => Some(Self::Material),
            "LABOR" => Some(Self::Labor),
            "EXPENSE" => Some(Self::Expense),
            "OVERHEAD" => Some(Self::Overhead),
            "PROFIT" => Some(Self::Profit),
            "MANUAL" => Some(Self::Manual),
            _ => None,
        }
    }

    /// Title given to a freshly added section of this type.
    pub fn default_title(&self) -> &'static str {
        match self {
            Self::Material => "Materials",
            Self::Labor => "Labor",
            Self::Expense => "Expenses",
            Self::Overhead => "General overhead",
            Self::Profit => "Profit",
            Self::Manual => "Manual",
        }
    }

    /// Position of this type in [`SectionType::ALL`].
    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Material => 0,
            Self::Labor => 1,
            Self::Expense => 2,
            Self::Overhead => 3,
            Self::Profit => 4,
            Self::Manual => 5,
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

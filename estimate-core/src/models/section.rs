use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::coerce::optional_decimal;
use super::{Line, SectionType};

/// 1-based order of the item at `position`, saturating at `u32::MAX`.
pub(crate) fn order_at(position: usize) -> u32 {
    u32::try_from(position).map_or(u32::MAX, |position| position.saturating_add(1))
}

/// An ordered group of lines under one cost category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "section_order")]
    pub order: u32,
    pub section_type: SectionType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub lines: Vec<Line>,
    /// Derived; filled in by the engine.
    #[serde(default, deserialize_with = "optional_decimal")]
    pub subtotal: Option<Decimal>,
}

impl Section {
    /// An empty section carrying the type's default title.
    pub fn new(
        order: u32,
        section_type: SectionType,
    ) -> Self {
        Self {
            order,
            section_type,
            title: section_type.default_title().to_string(),
            lines: Vec::new(),
            subtotal: None,
        }
    }

    /// Appends lines, numbering them after the existing ones.
    pub fn with_lines(
        mut self,
        lines: impl IntoIterator<Item = Line>,
    ) -> Self {
        for mut line in lines {
            line.order = order_at(self.lines.len());
            self.lines.push(line);
        }
        self
    }

    pub(crate) fn renumber_lines(&mut self) {
        for (position, line) in self.lines.iter_mut().enumerate() {
            line.order = order_at(position);
        }
    }

    pub fn line(
        &self,
        order: u32,
    ) -> Option<&Line> {
        self.lines.iter().find(|line| line.order == order)
    }
}

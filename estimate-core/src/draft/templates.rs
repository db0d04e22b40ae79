use rust_decimal::Decimal;

use crate::calculations::{OVERHEAD_FORMULA, PROFIT_FORMULA};
use crate::models::{Line, SectionType};

/// Lines pre-filled into a newly added section.
///
/// Expense sections start with the two statutory insurance premiums (a
/// percentage of labor) and a priced safety-management line; overhead and
/// profit start with their standard formula lines. Other types start empty.
pub fn template_lines(section_type: SectionType) -> Vec<Line> {
    match section_type {
        SectionType::Expense => vec![
            Line::percent_of(
                "Industrial accident insurance",
                SectionType::Labor,
                Decimal::new(37, 1),
            )
            .with_spec("of labor"),
            Line::percent_of("Employment insurance", SectionType::Labor, Decimal::new(101, 2))
                .with_spec("of labor"),
            Line::normal("Public safety management", "lot", Decimal::ONE, Decimal::ZERO)
                .with_spec("Public safety management"),
        ],
        SectionType::Overhead => vec![
            Line::formula("General overhead", OVERHEAD_FORMULA, Decimal::new(6, 0))
                .with_spec("materials + labor"),
        ],
        SectionType::Profit => vec![
            Line::formula("Profit", PROFIT_FORMULA, Decimal::new(15, 0))
                .with_spec("labor + expenses + overhead"),
        ],
        SectionType::Material | SectionType::Labor | SectionType::Manual => Vec::new(),
    }
}

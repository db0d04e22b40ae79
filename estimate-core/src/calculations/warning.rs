use std::fmt;

use serde::Serialize;

use crate::models::{Line, SectionType};

/// Identifies one line within an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineRef {
    pub section_type: SectionType,
    pub section_order: u32,
    pub line_order: u32,
}

impl LineRef {
    pub fn new(
        section_type: SectionType,
        section_order: u32,
        line: &Line,
    ) -> Self {
        Self {
            section_type,
            section_order,
            line_order: line.order,
        }
    }
}

impl fmt::Display for LineRef {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{} section #{} line #{}",
            self.section_type, self.section_order, self.line_order
        )
    }
}

/// A place where the engine fell back to a zero value instead of failing.
///
/// The amounts in the result are the same whether or not warnings were
/// raised; warnings only let callers flag data that is probably wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalculationWarning {
    /// A percent line has no base section type.
    MissingBaseSection { line: LineRef },
    /// A percent line points at a section type the estimate does not have.
    AbsentBaseSection { line: LineRef, base: SectionType },
    /// A formula line's formula is not one of the recognized aggregates.
    UnrecognizedFormula { line: LineRef, formula: String },
    /// A line's amount did not fit in a decimal.
    AmountOverflow { line: LineRef },
    /// A section's subtotal did not fit in a decimal.
    SubtotalOverflow { section_type: SectionType, section_order: u32 },
    /// The estimate totals did not fit in a decimal.
    TotalOverflow,
    /// More than one section shares a type; their subtotals are summed.
    DuplicateSectionType { section_type: SectionType, count: usize },
}

impl fmt::Display for CalculationWarning {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::MissingBaseSection { line } => {
                write!(f, "{line}: percent line has no base section; amount is 0")
            }
            Self::AbsentBaseSection { line, base } => {
                write!(f, "{line}: base section {base} is not in the estimate; amount is 0")
            }
            Self::UnrecognizedFormula { line, formula } => {
                write!(f, "{line}: unrecognized formula '{formula}'; priced as percent of base section")
            }
            Self::AmountOverflow { line } => write!(f, "{line}: amount overflowed; amount is 0"),
            Self::SubtotalOverflow {
                section_type,
                section_order,
            } => write!(
                f,
                "{section_type} section #{section_order}: subtotal overflowed; subtotal is 0"
            ),
            Self::TotalOverflow => f.write_str("estimate total overflowed; totals are 0"),
            Self::DuplicateSectionType {
                section_type,
                count,
            } => write!(f, "{count} sections of type {section_type}; subtotals are summed"),
        }
    }
}

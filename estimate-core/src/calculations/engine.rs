//! Estimate computation engine.
//!
//! Resolves every line amount, section subtotal and the estimate totals from
//! a draft list of sections.
//!
//! # Evaluation passes
//!
//! Lines are resolved in three passes, one per calculation mode. Each pass
//! sweeps every section before the next pass starts, so a later pass always
//! reads subtotals that earlier passes have finished:
//!
//! | Pass | Mode                  | Amount |
//! |------|-----------------------|--------|
//! | 1    | `NORMAL`              | `round(quantity × unit_price)` |
//! | 2    | `PERCENT_OF_SUBTOTAL` | `round(subtotal[base] × quantity / 100)` |
//! | 3    | `FORMULA`             | `round(aggregate)`, or as pass 2 for unrecognized formulas |
//!
//! Within a pass, sections are visited in list order and a section's subtotal
//! is republished as soon as its lines are resolved. Lookups read whatever
//! has been published; the engine never reorders sections or iterates to
//! satisfy a dependency.
//!
//! # Totals
//!
//! | Field      | Value |
//! |------------|-------|
//! | `subtotal` | sum of all section subtotals |
//! | `tax`      | `round(subtotal × tax_rate)` (10% by default) |
//! | `total`    | `subtotal + tax` |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use estimate_core::calculations::compute;
//! use estimate_core::{Line, Section, SectionType};
//!
//! let sections = vec![
//!     Section::new(1, SectionType::Material).with_lines([
//!         Line::normal("Cable", "EA", dec!(10), dec!(100)),
//!         Line::normal("Conduit", "EA", dec!(20), dec!(100)),
//!     ]),
//!     Section::new(2, SectionType::Expense)
//!         .with_lines([Line::percent_of("Handling", SectionType::Material, dec!(10))]),
//! ];
//!
//! let result = compute(&sections);
//!
//! assert_eq!(result.subtotals_by_type[SectionType::Material], dec!(3000));
//! assert_eq!(result.sections[1].lines[0].amount, Some(dec!(300)));
//! assert_eq!(result.subtotal, dec!(3300));
//! assert_eq!(result.tax, dec!(330));
//! assert_eq!(result.total, dec!(3630));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{checked_sum, percent_of, round_amount};
use crate::calculations::formula::Formula;
use crate::calculations::subtotals::SectionSubtotals;
use crate::calculations::warning::{CalculationWarning, LineRef};
use crate::models::coerce::strict_decimal;
use crate::models::{CalcMode, Line, Section, SectionType};

/// Errors in an [`EstimateConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimateConfigError {
    /// The tax rate must be between 0 and 1.
    #[error("tax rate must be between 0 and 1, got {0}")]
    InvalidTaxRate(Decimal),
}

/// Parameters of the estimate totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateConfig {
    /// Value-added tax applied to the estimate subtotal. 10% by default.
    #[serde(default = "default_tax_rate", deserialize_with = "strict_decimal")]
    pub tax_rate: Decimal,
}

fn default_tax_rate() -> Decimal {
    Decimal::new(10, 2)
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
        }
    }
}

impl EstimateConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateConfigError::InvalidTaxRate`] if `tax_rate` is not
    /// in [0, 1].
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use estimate_core::calculations::{EstimateConfig, EstimateConfigError};
    ///
    /// let config = EstimateConfig { tax_rate: dec!(1.5) };
    ///
    /// assert_eq!(config.validate(), Err(EstimateConfigError::InvalidTaxRate(dec!(1.5))));
    /// ```
    pub fn validate(&self) -> Result<(), EstimateConfigError> {
        if self.tax_rate < Decimal::ZERO || self.tax_rate > Decimal::ONE {
            return Err(EstimateConfigError::InvalidTaxRate(self.tax_rate));
        }
        Ok(())
    }
}

/// Resolved estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateResult {
    /// Copy of the input with every `amount` and `subtotal` filled in.
    pub sections: Vec<Section>,
    /// Final subtotal per section type; absent types are zero.
    pub subtotals_by_type: SectionSubtotals,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    /// Zero-value fallbacks taken while resolving, in the order they occurred.
    pub warnings: Vec<CalculationWarning>,
}

impl EstimateResult {
    /// `true` when no fallback fired and every amount came from real data.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Stateless estimate calculator.
///
/// Calculation never fails: malformed lines resolve to zero and are reported
/// in [`EstimateResult::warnings`].
#[derive(Debug, Clone, Default)]
pub struct EstimateCalculator {
    config: EstimateConfig,
}

impl EstimateCalculator {
    /// Creates a calculator after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateConfigError`] if the configuration is invalid.
    pub fn new(config: EstimateConfig) -> Result<Self, EstimateConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Resolves `sections` without modifying them.
    pub fn calculate(
        &self,
        sections: &[Section],
    ) -> EstimateResult {
        let mut run = Run::new(sections);

        for mode in [CalcMode::Normal, CalcMode::PercentOfSubtotal, CalcMode::Formula] {
            run.pass(mode);
        }

        let (subtotal, tax, total) = match self.totals(&run.subtotals) {
            Some(totals) => totals,
            None => {
                run.record(CalculationWarning::TotalOverflow);
                (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
            }
        };

        debug!(
            sections = run.sections.len(),
            subtotal = %subtotal,
            tax = %tax,
            total = %total,
            warnings = run.warnings.len(),
            "estimate resolved"
        );

        EstimateResult {
            sections: run.sections,
            subtotals_by_type: run.subtotals,
            subtotal,
            tax,
            total,
            warnings: run.warnings,
        }
    }

    /// Estimate-level subtotal, tax and total.
    fn totals(
        &self,
        subtotals: &SectionSubtotals,
    ) -> Option<(Decimal, Decimal, Decimal)> {
        let subtotal = round_amount(subtotals.total()?);
        let tax = round_amount(subtotal.checked_mul(self.config.tax_rate)?);
        let total = subtotal.checked_add(tax)?;
        Some((subtotal, tax, total))
    }
}

/// Resolves `sections` with the default 10% tax rate.
pub fn compute(sections: &[Section]) -> EstimateResult {
    EstimateCalculator::default().calculate(sections)
}

/// Working state of one calculation.
struct Run {
    sections: Vec<Section>,
    subtotals: SectionSubtotals,
    present: Vec<SectionType>,
    warnings: Vec<CalculationWarning>,
}

impl Run {
    /// Copies the input and clears every derived field, so stale amounts
    /// from a previous run never leak into a sum.
    fn new(input: &[Section]) -> Self {
        let mut sections = input.to_vec();
        for section in &mut sections {
            section.subtotal = None;
            for line in &mut section.lines {
                line.amount = None;
            }
        }

        let mut run = Self {
            sections,
            subtotals: SectionSubtotals::default(),
            present: Vec::new(),
            warnings: Vec::new(),
        };

        for section_type in SectionType::ALL {
            let count = run
                .sections
                .iter()
                .filter(|section| section.section_type == section_type)
                .count();
            if count > 0 {
                run.present.push(section_type);
            }
            if count > 1 {
                run.record(CalculationWarning::DuplicateSectionType {
                    section_type,
                    count,
                });
            }
        }

        run
    }

    fn record(
        &mut self,
        warning: CalculationWarning,
    ) {
        record(&mut self.warnings, warning);
    }

    fn pass(
        &mut self,
        mode: CalcMode,
    ) {
        let mut resolved = 0usize;

        for index in 0..self.sections.len() {
            let section = &mut self.sections[index];
            let (section_type, section_order) = (section.section_type, section.order);

            for line in section.lines.iter_mut().filter(|line| line.calc_mode == mode) {
                let line_ref = LineRef::new(section_type, section_order, line);
                let value = match mode {
                    CalcMode::Normal => normal_value(line),
                    CalcMode::PercentOfSubtotal => percent_value(
                        line,
                        line_ref,
                        &self.subtotals,
                        &self.present,
                        &mut self.warnings,
                    ),
                    CalcMode::Formula => formula_value(
                        line,
                        line_ref,
                        &self.subtotals,
                        &self.present,
                        &mut self.warnings,
                    ),
                };

                let amount = match value {
                    Some(value) => round_amount(value),
                    None => {
                        record(
                            &mut self.warnings,
                            CalculationWarning::AmountOverflow { line: line_ref },
                        );
                        Decimal::ZERO
                    }
                };

                line.amount = Some(amount);
                if mode != CalcMode::Normal {
                    line.unit_price = None;
                }
                resolved += 1;
            }

            self.publish_subtotals();
        }

        debug!(mode = ?mode, lines = resolved, "evaluation pass complete");
    }

    /// Recomputes every section's subtotal from its current line amounts and
    /// rebuilds the per-type map. Sections sharing a type are summed.
    fn publish_subtotals(&mut self) {
        let mut subtotals = SectionSubtotals::default();
        let mut overflowed = Vec::new();

        for section in &mut self.sections {
            let subtotal = match checked_sum(section.lines.iter().map(Line::amount_or_zero)) {
                Some(sum) => round_amount(sum),
                None => {
                    overflowed.push((section.section_type, section.order));
                    Decimal::ZERO
                }
            };
            section.subtotal = Some(subtotal);
            if !subtotals.add(section.section_type, subtotal) {
                overflowed.push((section.section_type, section.order));
            }
        }

        for (section_type, section_order) in overflowed {
            self.record(CalculationWarning::SubtotalOverflow {
                section_type,
                section_order,
            });
        }

        self.subtotals = subtotals;
    }
}

/// Records a warning once and logs it.
fn record(
    warnings: &mut Vec<CalculationWarning>,
    warning: CalculationWarning,
) {
    if warnings.contains(&warning) {
        return;
    }
    warn!(warning = %warning, "estimate calculation fell back to zero");
    warnings.push(warning);
}

/// Pass 1: `quantity × unit_price`, with a missing price counting as zero.
fn normal_value(line: &Line) -> Option<Decimal> {
    line.quantity
        .checked_mul(line.unit_price.unwrap_or(Decimal::ZERO))
}

/// Pass 2: `quantity` percent of the base section's published subtotal.
fn percent_value(
    line: &Line,
    line_ref: LineRef,
    subtotals: &SectionSubtotals,
    present: &[SectionType],
    warnings: &mut Vec<CalculationWarning>,
) -> Option<Decimal> {
    let Some(base) = line.base_section_type else {
        record(warnings, CalculationWarning::MissingBaseSection { line: line_ref });
        return Some(Decimal::ZERO);
    };

    if !present.contains(&base) {
        record(
            warnings,
            CalculationWarning::AbsentBaseSection {
                line: line_ref,
                base,
            },
        );
    }

    percent_of(subtotals[base], line.quantity)
}

/// Pass 3: a recognized aggregate formula, or the percent-of-base fallback.
fn formula_value(
    line: &Line,
    line_ref: LineRef,
    subtotals: &SectionSubtotals,
    present: &[SectionType],
    warnings: &mut Vec<CalculationWarning>,
) -> Option<Decimal> {
    let raw = line.formula.as_deref().unwrap_or_default();

    let formula = Formula::parse(raw);
    if formula.is_recognized() {
        return formula.evaluate(subtotals);
    }

    record(
        warnings,
        CalculationWarning::UnrecognizedFormula {
            line: line_ref,
            formula: raw.to_string(),
        },
    );
    percent_value(line, line_ref, subtotals, present, warnings)
}

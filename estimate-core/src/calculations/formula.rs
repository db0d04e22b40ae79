//! Formula strings on `FORMULA` lines.
//!
//! Only two aggregate formulas are understood, matched by substring after all
//! whitespace is removed. Anything else is [`Formula::PercentOfBase`]: the
//! line is priced like a percent-of-subtotal line from its base section and
//! quantity.

use rust_decimal::Decimal;

use crate::calculations::common::checked_sum;
use crate::calculations::subtotals::SectionSubtotals;
use crate::models::SectionType;

/// General overhead: 6% of materials plus labor.
pub const OVERHEAD_FORMULA: &str = "(MATERIAL+LABOR)*0.06";

/// Profit: 15% of labor, expenses and overhead.
pub const PROFIT_FORMULA: &str = "(LABOR+EXPENSE+OVERHEAD)*0.15";

struct Pattern {
    terms: &'static str,
    factor: &'static str,
    sections: &'static [SectionType],
    rate: Decimal,
}

const RECOGNIZED: [Pattern; 2] = [
    Pattern {
        terms: "MATERIAL+LABOR",
        factor: "*0.06",
        sections: &[SectionType::Material, SectionType::Labor],
        rate: Decimal::from_parts(6, 0, 0, false, 2),
    },
    Pattern {
        terms: "LABOR+EXPENSE+OVERHEAD",
        factor: "*0.15",
        sections: &[SectionType::Labor, SectionType::Expense, SectionType::Overhead],
        rate: Decimal::from_parts(15, 0, 0, false, 2),
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    /// `(terms...) * rate` over section subtotals.
    PercentOfSum {
        terms: Vec<SectionType>,
        rate: Decimal,
    },
    /// Percent of the line's base section, using its quantity as the percent.
    PercentOfBase,
}

impl Formula {
    pub fn parse(raw: &str) -> Self {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

        RECOGNIZED
            .iter()
            .find(|pattern| compact.contains(pattern.terms) && compact.contains(pattern.factor))
            .map(|pattern| Formula::PercentOfSum {
                terms: pattern.sections.to_vec(),
                rate: pattern.rate,
            })
            .unwrap_or(Formula::PercentOfBase)
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Formula::PercentOfSum { .. })
    }

    /// Unrounded value of an aggregate formula; `None` for
    /// [`Formula::PercentOfBase`] or on overflow.
    pub fn evaluate(
        &self,
        subtotals: &SectionSubtotals,
    ) -> Option<Decimal> {
        match self {
            Formula::PercentOfSum { terms, rate } => {
                checked_sum(terms.iter().map(|term| subtotals[*term]))?.checked_mul(*rate)
            }
            Formula::PercentOfBase => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parses_overhead_formula() {
        assert_eq!(
            Formula::parse(OVERHEAD_FORMULA),
            Formula::PercentOfSum {
                terms: vec![SectionType::Material, SectionType::Labor],
                rate: dec!(0.06),
            }
        );
    }

    #[test]
    fn parses_profit_formula() {
        assert_eq!(
            Formula::parse(PROFIT_FORMULA),
            Formula::PercentOfSum {
                terms: vec![SectionType::Labor, SectionType::Expense, SectionType::Overhead],
                rate: dec!(0.15),
            }
        );
    }

    #[test]
    fn ignores_whitespace_anywhere() {
        let formula = Formula::parse(" ( MATERIAL + LABOR )\t* 0.06 ");

        assert!(formula.is_recognized());
    }

    #[test]
    fn matches_terms_and_factor_independently() {
        let formula = Formula::parse("0.5*(MATERIAL+LABOR)*0.06");

        assert!(formula.is_recognized());
    }

    #[test]
    fn wrong_factor_falls_back_to_percent_of_base() {
        assert_eq!(Formula::parse("(MATERIAL+LABOR)*0.07"), Formula::PercentOfBase);
    }

    #[test]
    fn empty_formula_falls_back_to_percent_of_base() {
        assert_eq!(Formula::parse(""), Formula::PercentOfBase);
    }

    #[test]
    fn evaluates_sum_of_section_subtotals() {
        let mut subtotals = SectionSubtotals::default();
        subtotals.add(SectionType::Material, dec!(3000));
        subtotals.add(SectionType::Labor, dec!(2000));

        let value = Formula::parse(OVERHEAD_FORMULA).evaluate(&subtotals);

        assert_eq!(value, Some(dec!(300)));
    }

    #[test]
    fn percent_of_base_has_no_aggregate_value() {
        let subtotals = SectionSubtotals::default();

        assert_eq!(Formula::PercentOfBase.evaluate(&subtotals), None);
    }
}

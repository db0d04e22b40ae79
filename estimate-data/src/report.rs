//! Plain-text rendering of a computed estimate.

use std::fmt;

use estimate_core::{CalcMode, EstimateResult, Line};
use rust_decimal::Decimal;

/// Formats an amount with `,` thousands separators, e.g. `1234567` as
/// `1,234,567`. Fractional digits are kept as-is.
pub fn format_amount(value: Decimal) -> String {
    let text = value.normalize().to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

fn unit_price_column(line: &Line) -> String {
    match line.calc_mode {
        CalcMode::Normal => format_amount(line.unit_price.unwrap_or(Decimal::ZERO)),
        CalcMode::PercentOfSubtotal | CalcMode::Formula => "auto".to_string(),
    }
}

/// Per-section breakdown followed by the totals and any calculation
/// warnings.
pub struct Report<'a>(pub &'a EstimateResult);

impl fmt::Display for Report<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let result = self.0;

        for section in &result.sections {
            writeln!(f, "{}. {} [{}]", section.order, section.title, section.section_type)?;
            for line in &section.lines {
                let name = match line.spec.as_deref().map(str::trim) {
                    Some(spec) if !spec.is_empty() => format!("{} ({spec})", line.name),
                    _ => line.name.clone(),
                };
                writeln!(
                    f,
                    "  {:>3}  {:<36} {:>8} {:<4} {:>12} {:>14}",
                    line.order,
                    name,
                    format_amount(line.quantity),
                    line.unit,
                    unit_price_column(line),
                    format_amount(line.amount_or_zero()),
                )?;
            }
            let subtotal = format_amount(section.subtotal.unwrap_or(Decimal::ZERO));
            writeln!(f, "  {:>83}", format!("subtotal {subtotal}"))?;
            writeln!(f)?;
        }

        writeln!(f, "Supply price  {:>16}", format_amount(result.subtotal))?;
        writeln!(f, "Tax           {:>16}", format_amount(result.tax))?;
        writeln!(f, "Total         {:>16}", format_amount(result.total))?;

        if !result.warnings.is_empty() {
            writeln!(f)?;
            for warning in &result.warnings {
                writeln!(f, "warning: {warning}")?;
            }
        }

        Ok(())
    }
}

/// Renders `result` as a plain-text [`Report`].
pub fn render(result: &EstimateResult) -> String {
    Report(result).to_string()
}

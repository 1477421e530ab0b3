//! Narrative messages for monthly summaries

use crate::models::{MonthlyReport, MonthlySummary, Status, Transaction};
use crate::summary::summarize;

/// Format an amount with two decimals and comma thousands separators
///
/// `1234567.891` becomes `1,234,567.89`; negative values keep their sign.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Explain a summary in one or two sentences
pub fn explain(summary: &MonthlySummary) -> String {
    if summary.income <= 0.0 && summary.expense > 0.0 {
        return "Solo detecté gastos este mes. Agrega ingresos (manual o recurrentes) para evaluar tu flujo."
            .to_string();
    }

    match summary.status {
        Status::Red => format!(
            "Mes en rojo. Te faltaron {} para cubrir tus gastos.",
            format_amount(summary.net.abs())
        ),
        Status::Yellow => format!(
            "Mes justo. Cerraste con {}. Si bajas un poco el gasto fijo, mejoras margen.",
            format_amount(summary.net)
        ),
        Status::Green => format!(
            "Buen mes. Cerraste con {} neto. Mantén el control y evita picos de gasto.",
            format_amount(summary.net)
        ),
    }
}

/// Summarize a month and attach its narrative
pub fn report(transactions: &[Transaction], month: &str) -> MonthlyReport {
    let summary = summarize(transactions, month);
    let message = explain(&summary);
    MonthlyReport { summary, message }
}

//! Renders ratio results as Slack mrkdwn text.

use crate::ratio::{LossRatio, RatioResult};

/// Default alert threshold for the loss ratio, in percent.
pub const DEFAULT_THRESHOLD: f64 = 75.0;

/// Renders a result, prefixed with the workbook name when one is known.
///
/// Failures render as a single error line.
pub fn render(result: &RatioResult, file_name: Option<&str>, threshold: f64) -> String {
    match result {
        Ok(ratio) => render_ratio(ratio, file_name, threshold),
        Err(err) => match file_name {
            Some(name) => format!("❌ *Error ({name}):* {err}"),
            None => format!("❌ *Error:* {err}"),
        },
    }
}

fn render_ratio(ratio: &LossRatio, file_name: Option<&str>, threshold: f64) -> String {
    let header = match file_name {
        Some(name) => format!("📄 *Analysis of: {name}*\n\n"),
        None => String::new(),
    };
    let warning = if ratio.exceeds(threshold) {
        format!(
            "\n⚠️ *Warning:* Loss ratio exceeds {}% threshold!",
            format_threshold(threshold)
        )
    } else {
        String::new()
    };

    format!(
        "{header}📊 *Actuarial Loss Ratio Analysis*\n\n\
         *Premium:* {}\n\
         *Claims:* {}\n\
         *Loss Ratio:* {:.1}%\n\
         *Policies Analyzed:* {}{warning}\n",
        format_currency(ratio.premium),
        format_currency(ratio.claims),
        ratio.ratio,
        ratio.record_count,
    )
}

/// Appends model commentary under its own heading.
pub fn append_insight(message: &mut String, insight: &str) {
    message.push_str("\n🤖 *AI Insights:*\n_");
    message.push_str(insight);
    message.push('_');
}

/// The configured threshold as written: `75.0`, `72.25`.
pub fn format_threshold(threshold: f64) -> String {
    format!("{threshold:?}")
}

/// `$1,234,568`: whole units with thousands separators, halves rounded to
/// even. Negative amounts render as `$-2,500`.
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", value.abs());
    format!("${sign}{}", group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

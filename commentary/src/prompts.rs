use actuarial::LossRatio;
use actuarial::format::{format_currency, format_threshold};

pub const SUMMARY_SYSTEM_PROMPT: &str =
    "You are an expert actuarial analyst providing concise, actionable insights.";

pub const ANSWER_SYSTEM_PROMPT: &str =
    "You are an expert actuarial consultant providing clear, data-driven answers.";

fn facts(ratio: &LossRatio, threshold: f64) -> String {
    format!(
        "- Total Premium: {}\n\
         - Total Claims: {}\n\
         - Loss Ratio: {:.1}%\n\
         - Number of Policies: {}\n\
         - Risk Threshold: {}%",
        format_currency(ratio.premium),
        format_currency(ratio.claims),
        ratio.ratio,
        ratio.record_count,
        format_threshold(threshold),
    )
}

pub fn summary_prompt(ratio: &LossRatio, threshold: f64) -> String {
    format!(
        "You are an expert actuary analyzing insurance portfolio data.\n\n\
         Analysis Results:\n{}\n\n\
         Provide a brief, professional 2-3 sentence insight about:\n\
         1. What this loss ratio indicates about portfolio health\n\
         2. Whether it's above/below threshold and what that means\n\
         3. One actionable recommendation\n\n\
         Keep it concise and business-focused.",
        facts(ratio, threshold)
    )
}

pub fn answer_prompt(question: &str, ratio: &LossRatio, threshold: f64) -> String {
    format!(
        "You are an expert actuary. A user is asking about their portfolio analysis.\n\n\
         Current Analysis Context:\n{}\n\n\
         User Question: {question}\n\n\
         Provide a clear, professional answer based on the analysis data above. \
         Be specific and reference the actual numbers. Keep it under 4 sentences.",
        facts(ratio, threshold)
    )
}

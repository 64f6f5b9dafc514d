use actuarial::RatioResult;
use actuarial::format::{append_insight, render};
use commentary::Commentary;

/// Renders `result` for the channel, appending an AI insight when asked for
/// and available.
pub async fn compose(
    result: &RatioResult,
    file_name: Option<&str>,
    threshold: f64,
    commentary: Option<&Commentary>,
) -> String {
    let mut message = render(result, file_name, threshold);

    if let (Ok(ratio), Some(commentary)) = (result, commentary)
        && let Some(insight) = commentary.summarize(ratio).await
    {
        append_insight(&mut message, &insight);
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{ScriptedCompletions, commentary_with};
    use actuarial::{AnalysisError, LossRatio};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_compose_without_commentary() {
        let result: RatioResult = Ok(LossRatio::new(1000.0, 100.0, 1));
        let message = compose(&result, Some("q1.xlsx"), 75.0, None).await;
        assert_eq!(message, render(&result, Some("q1.xlsx"), 75.0));
    }

    #[tokio::test]
    async fn test_compose_appends_insight() {
        let api = Arc::new(ScriptedCompletions::replying("Healthy portfolio."));
        let commentary = commentary_with(api.clone());

        let result: RatioResult = Ok(LossRatio::new(1000.0, 100.0, 1));
        let message = compose(&result, None, 75.0, Some(&commentary)).await;
        assert!(message.ends_with("\n\n🤖 *AI Insights:*\n_Healthy portfolio._"));
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_compose_skips_commentary_for_errors() {
        let api = Arc::new(ScriptedCompletions::replying("unused"));
        let commentary = commentary_with(api.clone());

        let result: RatioResult = Err(AnalysisError::NotFound);
        let message = compose(&result, None, 75.0, Some(&commentary)).await;
        assert_eq!(message, "❌ *Error:* Excel file not found");
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_compose_degrades_when_commentary_fails() {
        let api = Arc::new(ScriptedCompletions::failing());
        let commentary = commentary_with(api.clone());

        let result: RatioResult = Ok(LossRatio::new(1000.0, 100.0, 1));
        let message = compose(&result, None, 75.0, Some(&commentary)).await;
        assert_eq!(message, render(&result, None, 75.0));
        assert_eq!(api.calls(), 1);
    }
}

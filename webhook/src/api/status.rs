use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::response::Html;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    message: &'static str,
    slack_token: &'static str,
    deepseek_api: &'static str,
    deployed: bool,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Actuarial Slackbot is running!",
        slack_token: state.credentials.slack_token,
        deepseek_api: state.credentials.completion_api,
        deployed: true,
    })
}

const HOME_PAGE: &str = r#"<html>
<body style="font-family: Arial; padding: 40px; background: #f5f5f5;">
    <h1>🤖 Actuarial Slackbot</h1>
    <p>AI-powered actuarial analysis tool</p>
    <h3>Status: ✅ Running</h3>
    <h3>Features:</h3>
    <ul>
        <li>📊 Automated loss ratio calculations</li>
        <li>📤 Excel file upload support</li>
        <li>🤖 AI-powered insights (DeepSeek)</li>
        <li>💬 Conversational Q&amp;A with /explain</li>
    </ul>
    <p><a href="/health">Check Health Status</a></p>
</body>
</html>
"#;

/// `GET /`
pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

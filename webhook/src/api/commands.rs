use crate::api::protocol::{CommandReply, SlashCommand};
use crate::metrics_defs::COMMANDS_RECEIVED;
use crate::reports;
use crate::session::SessionKey;
use crate::slack::deliver;
use crate::state::AppState;
use actuarial::Source;
use axum::Json;
use axum::extract::{Form, State};
use commentary::CommentaryError;
use commentary::generator::failed_answer;
use shared::counter;

pub const MISSING_QUESTION: &str =
    "❓ Please ask a question! Example: `/explain why is the loss ratio high?`";

pub const NO_ANALYSIS: &str =
    "⚠️ No analysis data available. Please upload a file or run `/lossratio` first.";

/// `POST /lossratio`: analyses the channel's last upload, or the default workbook.
pub async fn loss_ratio(
    State(state): State<AppState>,
    Form(command): Form<SlashCommand>,
) -> Json<CommandReply> {
    counter!(COMMANDS_RECEIVED, "command" => "lossratio").increment(1);
    let key = SessionKey::new(command.team_id, command.channel_id);

    let (source, file_name) = match state.sessions.stored_file(&key) {
        Some(file) => {
            tracing::info!(file = %file.name, "Using last uploaded file");
            (file.source, Some(file.name))
        }
        None => {
            tracing::info!(
                path = %state.calculator.default_source().display(),
                "Using default file"
            );
            (Source::Default, None)
        }
    };

    let result = state.calculator.analyze(&source).await;
    state.sessions.record_result(key, result.clone());

    let text = reports::compose(
        &result,
        file_name.as_deref(),
        state.threshold,
        state.commentary.as_deref(),
    )
    .await;

    Json(CommandReply::in_channel(text))
}

/// `POST /explain`: acknowledges at once and posts the answer from a background task.
pub async fn explain(
    State(state): State<AppState>,
    Form(command): Form<SlashCommand>,
) -> Json<CommandReply> {
    counter!(COMMANDS_RECEIVED, "command" => "explain").increment(1);

    let question = command.text.trim().to_string();
    if question.is_empty() {
        return Json(CommandReply::ephemeral(MISSING_QUESTION));
    }

    let key = SessionKey::new(command.team_id, command.channel_id);
    let result = match state.sessions.last_result(&key) {
        Some(result @ Ok(_)) => result,
        _ => return Json(CommandReply::ephemeral(NO_ANALYSIS)),
    };

    let reply = format!("❓ *Question:* {question}\n\n🤖 _Thinking..._");
    tracing::info!(user = %command.user_id, channel = %key.channel_id, "Answering question");

    let commentary = state.commentary.clone();
    let chat = state.chat.clone();
    let channel = key.channel_id;
    state.tasks.spawn("explain", async move {
        let answer = match commentary {
            Some(commentary) => commentary.answer(&question, Some(&result)).await,
            None => failed_answer(&CommentaryError::NotConfigured),
        };
        deliver(
            chat.as_ref(),
            &channel,
            &format!("🤖 *AI Answer:*\n{answer}"),
        )
        .await;
    });

    Json(CommandReply::in_channel(reply))
}

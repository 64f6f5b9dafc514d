use crate::api::protocol::{Event, EventEnvelope, RETRY_HEADER, SharedFile};
use crate::errors::WebhookError;
use crate::metrics_defs::EVENTS_RECEIVED;
use crate::reports;
use crate::session::{SessionKey, StoredFile};
use crate::slack::deliver;
use crate::state::AppState;
use actuarial::format::render;
use actuarial::source::is_spreadsheet_name;
use actuarial::{AnalysisError, RatioResult, Source};
use axum::Json;
use axum::extract::State;
use bytes::Bytes;
use http::HeaderMap;
use serde_json::{Value, json};
use shared::counter;

/// `POST /slack/events`
pub async fn handle_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, WebhookError> {
    let envelope: EventEnvelope = serde_json::from_slice(&body)?;

    if let Some(challenge) = envelope.challenge {
        counter!(EVENTS_RECEIVED, "kind" => "url_verification").increment(1);
        tracing::info!("Received Slack verification challenge");
        return Ok(Json(json!({ "challenge": challenge })));
    }

    if headers.contains_key(RETRY_HEADER) {
        counter!(EVENTS_RECEIVED, "kind" => "retry").increment(1);
        tracing::info!("Ignoring Slack retry");
        return Ok(ok());
    }

    let Some(event) = envelope.event() else {
        return Ok(ok());
    };
    tracing::debug!(kind = ?event.kind, subtype = ?event.subtype, "Received event");

    if !event.is_file_share() {
        counter!(EVENTS_RECEIVED, "kind" => "ignored").increment(1);
        return Ok(ok());
    }
    counter!(EVENTS_RECEIVED, "kind" => "file_share").increment(1);

    let Some(channel) = event.channel.clone() else {
        tracing::warn!("File share event without a channel");
        return Ok(ok());
    };
    let team_id = envelope
        .team_id
        .or_else(|| event.team.clone())
        .unwrap_or_default();

    handle_file_share(&state, SessionKey::new(team_id, channel), &event).await;

    Ok(ok())
}

fn ok() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn handle_file_share(state: &AppState, key: SessionKey, event: &Event) {
    let Some(file) = event.files.first() else {
        return;
    };
    let name = file.name.clone().unwrap_or_else(|| "unknown".to_string());
    tracing::info!(file = %name, channel = %key.channel_id, "File uploaded");

    if !is_spreadsheet_name(&name) {
        tracing::info!(file = %name, "Uploaded file is not a spreadsheet");
        let result: RatioResult = Err(AnalysisError::UnsupportedFile(name));
        deliver(
            state.chat.as_ref(),
            &key.channel_id,
            &render(&result, None, state.threshold),
        )
        .await;
        return;
    }

    let source = match download_source(file) {
        Ok(source) => source,
        Err(err) => {
            tracing::warn!(file = %name, error = %err, "Spreadsheet has no usable download URL");
            let result: RatioResult = Err(err);
            deliver(
                state.chat.as_ref(),
                &key.channel_id,
                &render(&result, Some(&name), state.threshold),
            )
            .await;
            return;
        }
    };

    let result = state.calculator.analyze(&source).await;
    let channel = key.channel_id.clone();
    state.sessions.record_upload(
        key,
        StoredFile {
            source,
            name: name.clone(),
        },
        result.clone(),
    );

    let message = reports::compose(
        &result,
        Some(&name),
        state.threshold,
        state.commentary.as_deref(),
    )
    .await;
    deliver(state.chat.as_ref(), &channel, &message).await;
}

fn download_source(file: &SharedFile) -> Result<Source, AnalysisError> {
    let raw = file
        .url_private
        .as_deref()
        .ok_or_else(|| AnalysisError::Download("file has no private URL".into()))?;
    match Source::from_locator(raw) {
        source @ Source::Remote(_) => Ok(source),
        _ => Err(AnalysisError::Download(format!("not a download URL: {raw}"))),
    }
}

//! `/stream` handler: validate, register, generate, stream.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use glm_engine::{GenerationParams, GenerationRequest};

use crate::{
    error::ServerError,
    history::{self, HistoryNormalizer},
    models::StreamRequest,
    pipeline,
    registry::Session,
    state::AppState,
};

/// Handle a streaming generation request.
///
/// Anything wrong with the request is answered with a plain JSON error and
/// no session id is consumed. Once the engine has started, the response is
/// an SSE stream and failures arrive as its last frame.
pub async fn handle_stream(
    State(state): State<AppState>,
    body: Result<Json<StreamRequest>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(req) = body.inspect_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "rejected stream body");
    })?;
    let request = validate(req, &state.config.defaults, &state.history);
    let request = request.inspect_err(|err| {
        tracing::warn!(error = %err, "rejected stream request");
    })?;

    let session_id = state.sessions.next_session_id();
    let session = Session {
        id: session_id,
        request,
    };
    log_accepted(state.engine.model_name(), &session);

    if state.config.rearm_on_stream {
        state.cancel.resume();
    }

    let guard = state.sessions.open(session_id);
    let flag = state.cancel.watch();
    let source = state
        .engine
        .generate(session.request, flag.clone())
        .inspect_err(|err| {
            tracing::error!(session_id, error = %err, "engine refused to start");
        })?;

    Ok(pipeline::stream_session(source, flag, guard).into_response())
}

fn log_accepted(model: &str, session: &Session) {
    let Session { id, request } = session;
    tracing::info!(
        session_id = id,
        model = %model,
        query = %request.query,
        answer_prefix = %request.answer_prefix,
        history_turns = request.history.len(),
        max_length = request.params.max_length,
        top_p = request.params.top_p,
        temperature = request.params.temperature,
        "stream accepted"
    );
    if !request.history.is_empty() {
        tracing::info!(session_id = id, history = ?request.history, "stream history");
    }
}

fn validate(
    req: StreamRequest,
    defaults: &GenerationParams,
    normalizer: &HistoryNormalizer,
) -> Result<GenerationRequest, ServerError> {
    let query = match req.query {
        Some(query) if !query.trim().is_empty() => query,
        Some(_) => return Err(ServerError::InvalidRequest("query must not be empty".into())),
        None => return Err(ServerError::InvalidRequest("query is required".into())),
    };

    let params = GenerationParams {
        max_length: req.max_length.unwrap_or(defaults.max_length),
        top_p: req.top_p.unwrap_or(defaults.top_p),
        temperature: req.temperature.unwrap_or(defaults.temperature),
    };
    params
        .validate()
        .map_err(|err| ServerError::InvalidRequest(err.to_string()))?;

    let turns = history::parse_turns(req.history.unwrap_or_default())?;

    Ok(GenerationRequest {
        query,
        answer_prefix: req.answer_prefix.unwrap_or_default(),
        history: normalizer.normalize(turns),
        params,
    })
}

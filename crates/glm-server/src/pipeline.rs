//! Session event pipeline and Server-Sent Events encoding.
//!
//! A session's output is built from three stream stages:
//!
//! 1. [`lift`] turns the engine's `Result<String>` items into
//!    [`SessionEvent`]s, ending with exactly one `Done` or `Error`.
//! 2. [`log_outcome`] passes events through unchanged and logs how the
//!    session ended together with its final text.
//! 3. [`encode`] renders events as `data: <json>\n\n` frames.
//!
//! Failures flow through the same channel as progress, so a failed session
//! still ends with a well-formed frame instead of a broken response.

use std::convert::Infallible;

use axum::response::sse::{Event, Sse};
use futures::stream::Stream;
use futures::StreamExt;
use glm_engine::{CancellationFlag, PartialStream};

use crate::models::StreamFrame;
use crate::registry::SessionGuard;

/// One step of a session as seen by the HTTP layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Cumulative text generated so far.
    Partial(String),
    /// The engine finished (budget, end of output, or interrupt).
    Done,
    /// The engine failed. Always the last event.
    Error(String),
}

/// Stage 1: lift engine output into session events.
pub fn lift(mut source: PartialStream) -> impl Stream<Item = SessionEvent> {
    async_stream::stream! {
        while let Some(item) = source.next().await {
            match item {
                Ok(text) => yield SessionEvent::Partial(text),
                Err(err) => {
                    yield SessionEvent::Error(err.to_string());
                    return;
                }
            }
        }
        yield SessionEvent::Done;
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Interrupted,
    Failed,
}

/// Classify a terminal event. `flag` must be the session's own
/// [`CancellationFlag::watch`] handle, so the answer reflects what this
/// session's engine observed rather than the current global state.
pub fn outcome(event: &SessionEvent, flag: &CancellationFlag) -> Option<Outcome> {
    match event {
        SessionEvent::Partial(_) => None,
        SessionEvent::Done if flag.was_tripped() => Some(Outcome::Interrupted),
        SessionEvent::Done => Some(Outcome::Completed),
        SessionEvent::Error(_) => Some(Outcome::Failed),
    }
}

/// Stage 2: log the session outcome without altering the events.
pub fn log_outcome<S>(
    session_id: u64,
    flag: CancellationFlag,
    events: S,
) -> impl Stream<Item = SessionEvent>
where
    S: Stream<Item = SessionEvent>,
{
    async_stream::stream! {
        let mut last = String::new();
        for await event in events {
            match (&event, outcome(&event, &flag)) {
                (SessionEvent::Partial(text), _) => last.clone_from(text),
                (_, Some(Outcome::Completed)) => {
                    tracing::info!(session_id, text = %last, "generation completed");
                }
                (_, Some(Outcome::Interrupted)) => {
                    tracing::info!(session_id, partial = %last, "generation interrupted");
                }
                (SessionEvent::Error(message), _) => {
                    tracing::error!(
                        session_id,
                        error = %message,
                        partial = %last,
                        "generation failed"
                    );
                }
                _ => {}
            }
            yield event;
        }
    }
}

/// The wire payload for `event`, or `None` when the event ends the stream
/// without a frame.
pub fn render_frame(session_id: u64, event: &SessionEvent) -> Option<StreamFrame> {
    match event {
        SessionEvent::Partial(text) => Some(StreamFrame::text(session_id, text.as_str())),
        SessionEvent::Error(message) => Some(StreamFrame::error(session_id, message.as_str())),
        SessionEvent::Done => None,
    }
}

/// Stage 3: encode events as SSE frames, in order, one frame per event.
pub fn encode<S>(session_id: u64, events: S) -> impl Stream<Item = Result<Event, Infallible>>
where
    S: Stream<Item = SessionEvent>,
{
    async_stream::stream! {
        for await event in events {
            let Some(frame) = render_frame(session_id, &event) else {
                return;
            };
            yield Ok(to_event(&frame));
        }
    }
}

fn to_event(frame: &StreamFrame) -> Event {
    Event::default()
        .json_data(frame)
        .unwrap_or_else(|err| {
            tracing::error!(
                session_id = frame.session_id,
                error = %err,
                "frame serialization failed"
            );
            Event::default().data(err.to_string())
        })
}

/// Build the SSE response for one session.
///
/// The stream owns the `SessionGuard`. When the client disconnects, axum drops
/// the stream, which drops the engine stream and the guard, closing the
/// session. No keep-alive comments are sent: the body carries `data:` frames
/// only, even while the session waits for the model.
pub fn stream_session(
    source: PartialStream,
    flag: CancellationFlag,
    guard: SessionGuard,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = guard.session_id();
    let frames = encode(session_id, log_outcome(session_id, flag, lift(source)));

    let stream = async_stream::stream! {
        // Keep guard alive for the lifetime of the stream.
        let _guard = guard;
        for await frame in frames {
            yield frame;
        }
    };

    Sse::new(stream)
}

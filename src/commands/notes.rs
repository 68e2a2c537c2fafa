//! Note commands: play, stop, panic

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::SharedDispatcher;
use crate::dispatcher::{DispatchError, PlayOutcome, StopOutcome};
use crate::midi::MidiDriver;

/// Body of `/play` and `/stop`
#[derive(Debug, Clone, Deserialize)]
pub struct PlayNoteRequest {
    /// MIDI note number (e.g. 60 for middle C)
    pub note: i64,
    /// General MIDI program number (0-127). Ignored by `/stop`.
    pub instrument: i64,
}

/// Start a note, switching instrument first if needed
pub async fn play_note<D: MidiDriver>(
    State(dispatcher): State<SharedDispatcher<D>>,
    Json(request): Json<PlayNoteRequest>,
) -> Result<Json<PlayOutcome>, DispatchError> {
    dispatcher.play(request.note, request.instrument).map(Json)
}

/// Release a note
pub async fn stop_note<D: MidiDriver>(
    State(dispatcher): State<SharedDispatcher<D>>,
    Json(request): Json<PlayNoteRequest>,
) -> Result<Json<StopOutcome>, DispatchError> {
    dispatcher.stop(request.note).map(Json)
}

/// Send all notes off
pub async fn all_notes_off<D: MidiDriver>(
    State(dispatcher): State<SharedDispatcher<D>>,
) -> Result<Json<Value>, DispatchError> {
    dispatcher.panic()?;
    Ok(Json(json!({ "status": "silenced" })))
}

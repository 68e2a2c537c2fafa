//! HTTP commands exposed by the server

pub mod devices;
pub mod notes;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::dispatcher::{DispatchError, NoteDispatcher};
use crate::midi::MidiDriver;

/// Dispatcher shared by every handler
pub type SharedDispatcher<D> = Arc<NoteDispatcher<D>>;

/// Build the router over a dispatcher
pub fn router<D: MidiDriver>(dispatcher: SharedDispatcher<D>) -> Router {
    Router::new()
        .route("/play", post(notes::play_note::<D>))
        .route("/stop", post(notes::stop_note::<D>))
        .route("/panic", post(notes::all_notes_off::<D>))
        .route("/status", get(devices::get_status::<D>))
        .route("/devices", get(devices::list_devices::<D>))
        .route("/device", post(devices::open_device::<D>))
        .route("/instruments", get(devices::list_gm_instruments))
        .with_state(dispatcher)
}

impl DispatchError {
    fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::DriverUnavailable(_) => "driver_unavailable",
            Self::Driver(_) => "driver_error",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidParameter { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DriverUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Driver(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("Rejected request: {}", self);
        }

        let body = Json(json!({
            "error": self.kind(),
            "detail": self.to_string(),
        }));
        (status, body).into_response()
    }
}

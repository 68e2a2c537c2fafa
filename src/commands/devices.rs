//! Device commands: enumerate ports and instruments, switch port, report status

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::SharedDispatcher;
use crate::dispatcher::{DispatchError, DispatcherStatus, NoteDispatcher};
use crate::midi::{list_instruments, InstrumentInfo, MidiDeviceInfo, MidiDriver, MidiError};

#[derive(Debug, Clone, Deserialize)]
pub struct OpenDeviceRequest {
    pub index: usize,
}

/// Get list of available MIDI output devices
pub async fn list_devices<D: MidiDriver>() -> Result<Json<Vec<MidiDeviceInfo>>, DispatchError> {
    // Port enumeration talks to the OS MIDI service, keep it off the runtime
    tokio::task::spawn_blocking(NoteDispatcher::<D>::devices)
        .await
        .map_err(|e| DispatchError::DriverUnavailable(MidiError::Init(e.to_string())))?
        .map(Json)
}

/// General MIDI program table
pub async fn list_gm_instruments() -> Json<Vec<InstrumentInfo>> {
    Json(list_instruments())
}

/// Switch to another output port
pub async fn open_device<D: MidiDriver>(
    State(dispatcher): State<SharedDispatcher<D>>,
    Json(request): Json<OpenDeviceRequest>,
) -> Result<Json<Value>, DispatchError> {
    let device = dispatcher.open_device(request.index)?;
    Ok(Json(json!({ "device": device })))
}

pub async fn get_status<D: MidiDriver>(
    State(dispatcher): State<SharedDispatcher<D>>,
) -> Json<DispatcherStatus> {
    Json(dispatcher.status())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::commands::testing::{app, send};
    use crate::midi::recording::{DriverCall, RecordingDriver};

    #[tokio::test]
    async fn test_status_tracks_instrument() {
        let (app, _) = app(RecordingDriver::new());

        send(&app, "POST", "/play", Some(json!({"note": 60, "instrument": 12}))).await;
        let (status, body) = send(&app, "GET", "/status", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "connected": true,
                "device": "Recording Device 0",
                "current_instrument": 12,
                "instrument_name": "Marimba",
                "channel": 0,
                "velocity": 127
            })
        );
    }

    #[tokio::test]
    async fn test_list_devices() {
        let (app, _) = app(RecordingDriver::new());

        let (status, body) = send(&app, "GET", "/devices", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"index": 0, "name": "Recording Device 0"},
                {"index": 1, "name": "Recording Device 1"}
            ])
        );
    }

    #[tokio::test]
    async fn test_open_device_restores_instrument() {
        let driver = RecordingDriver::disconnected();
        let calls = driver.calls();
        let (app, _) = app(driver);

        let (status, body) = send(&app, "POST", "/device", Some(json!({"index": 1}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"device": "Recording Device 1"}));
        assert_eq!(
            *calls.lock(),
            vec![DriverCall::Open(1), DriverCall::SetInstrument(0)]
        );

        let (status, _) = send(&app, "POST", "/play", Some(json!({"note": 60, "instrument": 0}))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_open_missing_device_keeps_playing() {
        let (app, _) = app(RecordingDriver::new());

        let (status, body) = send(&app, "POST", "/device", Some(json!({"index": 99}))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "driver_unavailable");

        let (status, _) = send(&app, "POST", "/play", Some(json!({"note": 60, "instrument": 3}))).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "POST", "/stop", Some(json!({"note": 60, "instrument": 3}))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, "GET", "/status", None).await;
        assert_eq!(body["device"], "Recording Device 0");
    }

    #[tokio::test]
    async fn test_list_instruments() {
        let (app, _) = app(RecordingDriver::new());

        let (status, body) = send(&app, "GET", "/instruments", None).await;
        assert_eq!(status, StatusCode::OK);
        let table = body.as_array().unwrap();
        assert_eq!(table.len(), 128);
        assert_eq!(table[0], json!({"program": 0, "name": "Acoustic Grand Piano"}));
        assert_eq!(table[40], json!({"program": 40, "name": "Violin"}));
    }
}

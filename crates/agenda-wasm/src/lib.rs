//! WASM bindings for agenda-engine.
//!
//! Exposes agenda construction to JavaScript via `wasm-bindgen`. Settings,
//! records and the resulting entries all cross the boundary as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p agenda-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/agenda_wasm.wasm
//! ```

use agenda_engine::{build_agenda_from_raw, ProviderStatus, RawRecord, Settings};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Input format
// ---------------------------------------------------------------------------

/// Records as a bare array, or wrapped together with the provider status.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordsInput {
    Rows(Vec<RawRecord>),
    #[serde(rename_all = "camelCase")]
    Wrapped {
        records: Vec<RawRecord>,
        #[serde(default)]
        provider_status: ProviderStatus,
    },
}

// ---------------------------------------------------------------------------
// Plain-Rust core, kept free of JsValue so it runs on native targets too
// ---------------------------------------------------------------------------

fn build(settings_json: &str, records_json: &str) -> Result<String, String> {
    let settings = if settings_json.trim().is_empty() {
        Settings::default()
    } else {
        Settings::from_json(settings_json).map_err(|e| e.to_string())?
    };
    let input: RecordsInput = serde_json::from_str(records_json)
        .map_err(|e| format!("Invalid records JSON: {}", e))?;
    let (rows, status) = match input {
        RecordsInput::Rows(rows) => (rows, ProviderStatus::Ready),
        RecordsInput::Wrapped {
            records,
            provider_status,
        } => (records, provider_status),
    };

    let entries = build_agenda_from_raw(&settings, &rows, status).map_err(|e| e.to_string())?;
    serde_json::to_string(&entries).map_err(|e| format!("Serialization error: {}", e))
}

fn default_settings_json() -> Result<String, String> {
    serde_json::to_string(&Settings::default()).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Build the ordered agenda.
///
/// # Arguments
/// - `settings_json` -- settings object in camelCase; missing keys take their
///   defaults and an empty string means all defaults
/// - `records_json` -- array of raw records, or `{records, providerStatus}`
///
/// Returns a JSON string containing the array of entries.
#[wasm_bindgen(js_name = "buildAgenda")]
pub fn build_agenda(settings_json: &str, records_json: &str) -> Result<String, JsValue> {
    build(settings_json, records_json).map_err(|e| JsValue::from_str(&e))
}

/// The default settings object as a JSON string.
#[wasm_bindgen(js_name = "defaultSettings")]
pub fn default_settings() -> Result<String, JsValue> {
    default_settings_json().map_err(|e| JsValue::from_str(&e))
}

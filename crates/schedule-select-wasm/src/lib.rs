//! WASM bindings for schedule-select.
//!
//! Exposes a stateful [`SelectionSession`] plus week-mask and expansion
//! helpers to JavaScript via `wasm-bindgen`. Complex values cross the
//! boundary as JSON strings; the calendar UI translates gestures into
//! action JSON and renders cells through `isEnabledDate`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p schedule-select-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/schedule-select-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/schedule_select_wasm.wasm
//! ```

use chrono::NaiveDate;
use schedule_select::{
    expand_selection, SelectionAction, SelectionConfig, SelectionStore, SelectionValue, WeekMask,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DispatchDto<'a> {
    changed: bool,
    has_selection: bool,
    value: Option<&'a SelectionValue>,
    allowed_days: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_date(s: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| JsValue::from_str(&format!("Invalid date '{}': {}", s, e)))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_value(json: &str) -> Result<SelectionValue, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid selection value JSON: {}", e)))
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A selection engine instance owned by one calendar picker.
#[wasm_bindgen]
pub struct SelectionSession {
    store: SelectionStore,
}

#[wasm_bindgen]
impl SelectionSession {
    /// Create a session from a `SelectionConfig` JSON document (`"{}"` for
    /// defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<SelectionSession, JsValue> {
        let config =
            SelectionConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(SelectionSession {
            store: SelectionStore::new(config),
        })
    }

    /// Apply one action (e.g. `{"type":"range-change","start":"2026-03-02"}`).
    ///
    /// Returns `{changed, hasSelection, value, allowedDays}` as JSON.
    pub fn dispatch(&mut self, action_json: &str) -> Result<String, JsValue> {
        let action: SelectionAction = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid action JSON: {}", e)))?;
        let changed = self.store.dispatch(&action);
        let state = self.store.state();
        to_json(&DispatchDto {
            changed,
            has_selection: state.has_selection(),
            value: state.selection_value(),
            allowed_days: WeekMask::encode(state.effective_schedule_days()).to_string(),
        })
    }

    /// The current descriptor as JSON, or `"null"`.
    pub fn value(&self) -> Result<String, JsValue> {
        to_json(&self.store.value())
    }

    #[wasm_bindgen(js_name = "hasSelection")]
    pub fn has_selection(&self) -> bool {
        self.store.state().has_selection()
    }

    /// Whether the calendar cell for `date` (`YYYY-MM-DD`) is selected.
    #[wasm_bindgen(js_name = "isEnabledDate")]
    pub fn is_enabled_date(&self, date: &str) -> Result<bool, JsValue> {
        Ok(self.store.state().is_enabled_date(parse_date(date)?))
    }

    /// Whether the day at `offset` passes the schedule and toggles, ignoring
    /// the availability filter.
    #[wasm_bindgen(js_name = "isEnabledDay")]
    pub fn is_enabled_day(&self, offset: i32) -> bool {
        self.store.state().is_enabled_day(i64::from(offset))
    }

    /// Day offset of `date` relative to the session's current origin.
    #[wasm_bindgen(js_name = "offsetOf")]
    pub fn offset_of(&self, date: &str) -> Result<f64, JsValue> {
        Ok(self.store.state().index().offset_of(parse_date(date)?) as f64)
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Canonicalize a week-mask token, e.g. `"MO,TU,WE,TH,FR,SA,SU"` → `"WEEKDAY,WEEKEND"`.
#[wasm_bindgen(js_name = "canonicalWeekMask")]
pub fn canonical_week_mask(token: &str) -> Result<String, JsValue> {
    token
        .parse::<WeekMask>()
        .map(|mask| mask.to_string())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Expand a descriptor JSON into a JSON array of `YYYY-MM-DD` dates.
#[wasm_bindgen(js_name = "expandSelection")]
pub fn expand(value_json: &str) -> Result<String, JsValue> {
    let value = parse_value(value_json)?;
    let dates = expand_selection(&value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let dates: Vec<String> = dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect();
    to_json(&dates)
}

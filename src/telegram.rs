//! Telegram mini-app integration
//!
//! At game over the final result is handed to the host bot as an opaque
//! JSON payload. Delivery is fire-and-forget: the session never waits on it
//! and never learns whether it worked.

use serde::{Deserialize, Serialize};

/// Result sent to the bot when a run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPayload {
    pub score: u64,
    /// Whole meters
    pub distance: u64,
    /// Unix time (ms)
    pub timestamp: u64,
}

impl ResultPayload {
    pub fn new(score: u64, distance: f32, timestamp_ms: f64) -> Self {
        Self {
            score,
            distance: distance.max(0.0).floor() as u64,
            timestamp: timestamp_ms.max(0.0) as u64,
        }
    }

    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}

/// Receives game-over results
pub trait Notifier {
    fn send_result(&self, payload: &ResultPayload);
}

/// Drops every result (native builds, Telegram absent)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn send_result(&self, payload: &ResultPayload) {
        log::debug!("No result channel, dropping {payload:?}");
    }
}

/// Text for the share popup
pub fn share_text(score: u64) -> String {
    format!("I scored {score} points in Septic Surfer! Try to beat my record!")
}

/// Calls `window.Telegram.WebApp.sendData` when the page runs inside Telegram
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TelegramNotifier;

#[cfg(target_arch = "wasm32")]
impl TelegramNotifier {
    /// `window.Telegram.WebApp`, if present
    fn web_app() -> Option<wasm_bindgen::JsValue> {
        use js_sys::Reflect;
        use wasm_bindgen::JsValue;

        let window = web_sys::window()?;
        let telegram = Reflect::get(&window, &JsValue::from_str("Telegram")).ok()?;
        if telegram.is_undefined() || telegram.is_null() {
            return None;
        }
        let app = Reflect::get(&telegram, &JsValue::from_str("WebApp")).ok()?;
        (!app.is_undefined() && !app.is_null()).then_some(app)
    }

    /// Tell Telegram the app is ready and take the full viewport
    pub fn ready() {
        use wasm_bindgen::JsCast;

        let Some(app) = Self::web_app() else {
            return;
        };
        for method in ["ready", "expand"] {
            if let Ok(f) = js_sys::Reflect::get(&app, &wasm_bindgen::JsValue::from_str(method)) {
                if let Some(f) = f.dyn_ref::<js_sys::Function>() {
                    let _ = f.call0(&app);
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Notifier for TelegramNotifier {
    fn send_result(&self, payload: &ResultPayload) {
        use wasm_bindgen::{JsCast, JsValue};

        let Some(app) = Self::web_app() else {
            log::debug!("Not running inside Telegram, result not sent");
            return;
        };
        let Some(json) = payload.to_json() else {
            return;
        };
        let send = js_sys::Reflect::get(&app, &JsValue::from_str("sendData")).ok();
        match send.as_ref().and_then(|f| f.dyn_ref::<js_sys::Function>()) {
            Some(f) => {
                if f.call1(&app, &JsValue::from_str(&json)).is_err() {
                    log::warn!("Telegram sendData failed");
                }
            }
            None => log::warn!("Telegram.WebApp.sendData missing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_floors_distance() {
        let payload = ResultPayload::new(120, 87.9, 1_700_000_000_123.0);
        assert_eq!(payload.distance, 87);
        assert_eq!(
            payload.to_json().unwrap(),
            r#"{"score":120,"distance":87,"timestamp":1700000000123}"#
        );
    }

    #[test]
    fn test_share_text_mentions_score() {
        assert!(share_text(1500).contains("1500"));
    }
}

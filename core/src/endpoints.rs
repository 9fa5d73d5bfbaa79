//! Fixed-endpoint shortcuts over `OneSignal::request`.
//!
//! Each method only picks a verb and a path; see
//! <https://documentation.onesignal.com/reference> for the payloads.

use serde_json::{json, Value};

use crate::api::OneSignal;
use crate::error::{ApiError, Result};
use crate::transport::Transport;
use crate::types::{validate_purchases, DeviceType, Params};

impl<T: Transport> OneSignal<T> {
    /// View notifications of the app.
    pub fn notifications(&self) -> Result<Value> {
        self.get("notifications", Params::new())
    }

    /// Send a notification, e.g. with `contents` and `include_player_ids`.
    pub fn notifications_create(&self, params: Params) -> Result<Value> {
        self.post("notifications", params)
    }

    pub fn notifications_details(&self, notification_id: &str) -> Result<Value> {
        self.get(&format!("notifications/{notification_id}"), Params::new())
    }

    /// Cancel a scheduled notification.
    pub fn notifications_cancel(&self, notification_id: &str) -> Result<Value> {
        self.delete(&format!("notifications/{notification_id}"), Params::new())
    }

    /// Track that a notification was opened.
    pub fn notifications_open(&self, notification_id: &str) -> Result<Value> {
        let mut params = Params::new();
        params.insert("opened".to_string(), Value::Bool(true));
        self.put(&format!("notifications/{notification_id}"), params)
    }

    /// All apps visible to a user auth key.
    pub fn apps(&self) -> Result<Value> {
        self.get("apps", Params::new())
    }

    /// Details of `app_id`, or of the configured app when `None`.
    pub fn apps_details(&self, app_id: Option<&str>) -> Result<Value> {
        let app_id = app_id
            .or_else(|| self.app_id())
            .ok_or_else(|| ApiError::invalid_argument("an app id is required"))?;
        self.get(&format!("apps/{app_id}"), Params::new())
    }

    pub fn apps_create(&self, name: &str, mut params: Params) -> Result<Value> {
        params.insert("name".to_string(), Value::String(name.to_string()));
        self.post("apps", params)
    }

    pub fn apps_update(&self, app_id: &str, params: Params) -> Result<Value> {
        self.put(&format!("apps/{app_id}"), params)
    }

    /// View devices (players), e.g. with `limit` and `offset`.
    pub fn devices(&self, params: Params) -> Result<Value> {
        self.get("players", params)
    }

    pub fn devices_details(&self, player_id: &str) -> Result<Value> {
        self.get(&format!("players/{player_id}"), Params::new())
    }

    /// Register a device. `device_type` must be an integer or coerce to one;
    /// otherwise nothing is sent.
    pub fn devices_create(&self, device_type: impl Into<Value>, mut params: Params) -> Result<Value> {
        let device_type = DeviceType::coerce(&device_type.into())?;
        params.insert("device_type".to_string(), json!(device_type));
        self.post("players", params)
    }

    pub fn devices_update(&self, player_id: &str, params: Params) -> Result<Value> {
        self.put(&format!("players/{player_id}"), params)
    }

    /// Record a new session for a device.
    pub fn sessions_create(&self, player_id: &str, params: Params) -> Result<Value> {
        self.post(&format!("players/{player_id}/on_session"), params)
    }

    /// Track purchases. Every entry needs non-empty `sku`, `amount` and
    /// `iso`; an incomplete entry fails before anything is sent.
    pub fn purchases_create(&self, player_id: &str, purchases: Vec<Params>, mut params: Params) -> Result<Value> {
        validate_purchases(&purchases)?;
        let purchases = purchases.into_iter().map(Value::Object).collect();
        params.insert("purchases".to_string(), Value::Array(purchases));
        self.post(&format!("players/{player_id}/on_purchase"), params)
    }

    /// Add `active_time` seconds to the device's current session.
    pub fn sessions_length_update(&self, player_id: &str, active_time: u64) -> Result<Value> {
        let mut params = Params::new();
        params.insert("state".to_string(), json!("ping"));
        params.insert("active_time".to_string(), json!(active_time));
        self.post(&format!("players/{player_id}/on_focus"), params)
    }

    /// Start a CSV export of all devices; the reply carries `csv_file_url`.
    pub fn csv_export(&self, params: Params) -> Result<Value> {
        self.post("players/csv_export", params)
    }
}

//! Configuration (settings) endpoints.

use reqwest::Method;
use serde::Deserialize;

use crate::error::Result;
use crate::session::InverterClient;

const ENDPOINT_SETTINGS: &str = "/api/v1/settings";

/// Metadata of one setting as the inverter describes it.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingData {
    pub id: String,
    pub unit: Option<String>,
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub default: Option<String>,
    pub access: Option<String>,
}

/// A module with its settings catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsData {
    #[serde(rename = "moduleid")]
    pub module_id: String,
    pub settings: Vec<SettingData>,
}

/// A setting id with its current value.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsValue {
    pub id: String,
    pub value: String,
}

impl InverterClient {
    /// The full settings catalog: every module with its setting ids.
    pub async fn settings(&self) -> Result<Vec<SettingsData>> {
        self.authorized_request::<(), _>(Method::GET, ENDPOINT_SETTINGS, None)
            .await
    }

    /// Current values of all settings of one module.
    pub async fn settings_module(&self, module_id: &str) -> Result<Vec<SettingsValue>> {
        let path = format!("{ENDPOINT_SETTINGS}/{module_id}");
        self.authorized_request::<(), _>(Method::GET, &path, None).await
    }

    /// Current value of a single setting.
    pub async fn settings_module_setting(
        &self,
        module_id: &str,
        setting_id: &str,
    ) -> Result<Vec<SettingsValue>> {
        self.settings_module_settings(module_id, &[setting_id]).await
    }

    /// Current values of selected settings of one module.
    pub async fn settings_module_settings<S: AsRef<str>>(
        &self,
        module_id: &str,
        setting_ids: &[S],
    ) -> Result<Vec<SettingsValue>> {
        let ids = setting_ids
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        let path = format!("{ENDPOINT_SETTINGS}/{module_id}/{ids}");
        self.authorized_request::<(), _>(Method::GET, &path, None).await
    }
}

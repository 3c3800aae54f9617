//! Live measurement (processdata) endpoints.
//!
//! Values are grouped into modules (`devices:local`, `scb:statistic:...`,
//! and so on), each exposing a set of processdata ids. These calls ride
//! the authenticated session established by [`InverterClient::login`].

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::session::InverterClient;

const ENDPOINT_PROCESSDATA: &str = "/api/v1/processdata";

/// A module and the processdata ids it exposes.
///
/// Doubles as the request shape for batched value reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessDataIds {
    #[serde(rename = "moduleid")]
    pub module_id: String,
    #[serde(rename = "processdataids")]
    pub processdata_ids: Vec<String>,
}

/// One measured value.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessDataValue {
    pub id: String,
    #[serde(default)]
    pub unit: String,
    /// Numeric for most ids, but the API reserves the right to send
    /// strings for some.
    pub value: Value,
}

/// All requested values of one module.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessDataValues {
    #[serde(rename = "moduleid")]
    pub module_id: String,
    pub processdata: Vec<ProcessDataValue>,
}

impl InverterClient {
    /// List every module with its available processdata ids.
    pub async fn process_data(&self) -> Result<Vec<ProcessDataIds>> {
        self.authorized_request::<(), _>(Method::GET, ENDPOINT_PROCESSDATA, None)
            .await
    }

    /// All current values of one module.
    pub async fn process_data_module(&self, module_id: &str) -> Result<Vec<ProcessDataValues>> {
        let path = format!("{ENDPOINT_PROCESSDATA}/{module_id}");
        self.authorized_request::<(), _>(Method::GET, &path, None).await
    }

    /// Selected values of one module.
    pub async fn process_data_module_values<S: AsRef<str>>(
        &self,
        module_id: &str,
        processdata_ids: &[S],
    ) -> Result<Vec<ProcessDataValues>> {
        let ids = processdata_ids
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(",");
        let path = format!("{ENDPOINT_PROCESSDATA}/{module_id}/{ids}");
        self.authorized_request::<(), _>(Method::GET, &path, None).await
    }

    /// Values for several modules in one round-trip.
    pub async fn process_data_values(
        &self,
        request: &[ProcessDataIds],
    ) -> Result<Vec<ProcessDataValues>> {
        self.authorized_request(Method::POST, ENDPOINT_PROCESSDATA, Some(&request))
            .await
    }
}

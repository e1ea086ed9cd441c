use crate::error::TailError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Top-level `_search` response. Error responses carry `status` and `error`
// instead of `hits`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hits: Option<Hits>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Value>,
    pub hits: Vec<Hit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_source")]
    pub source: HitSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitSource {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl SearchResponse {
    pub fn from_slice(body: &[u8]) -> Result<Self, TailError> {
        serde_json::from_slice(body).map_err(TailError::DecodeResponse)
    }

    /// Fail when the body reports a non-2xx status.
    pub fn check_status(&self) -> Result<(), TailError> {
        match self.status {
            Some(status) if !(200..300).contains(&status) => Err(TailError::BackendStatus {
                status,
                detail: self.error_detail(),
            }),
            _ => Ok(()),
        }
    }

    pub fn error_detail(&self) -> String {
        match &self.error {
            Some(Value::String(reason)) => reason.clone(),
            Some(Value::Object(fields)) => fields
                .get("reason")
                .or_else(|| fields.get("type"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(fields.clone()).to_string()),
            Some(other) => other.to_string(),
            None => "no error detail".to_string(),
        }
    }

    pub fn into_hits(self) -> Result<Vec<Hit>, TailError> {
        self.hits.map(|hits| hits.hits).ok_or(TailError::MissingHits)
    }
}

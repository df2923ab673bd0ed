// Redemption payload - the JSON document handed to the barcode renderer
//
// Rendering the scannable image is an external collaborator's job; this
// module only builds the UTF-8 text payload. Field names and the stringly
// `totalPoints` match the shape scanners already accept.

use anyhow::Result;
use chrono::SecondsFormat;
use serde::Serialize;

use crate::entities::{LineItem, Transaction};

/// The document encoded into the redemption barcode.
#[derive(Debug, Clone, Serialize)]
pub struct RedemptionPayload {
    pub center: String,
    pub items: Vec<LineItem>,
    #[serde(rename = "totalPoints")]
    pub total_points: String,
    /// ISO-8601 timestamp of the recording.
    pub date: String,
}

impl RedemptionPayload {
    pub fn new(center_name: &str, tx: &Transaction) -> Self {
        RedemptionPayload {
            center: center_name.to_string(),
            items: tx.items.clone(),
            total_points: format!("{:.2}", tx.points),
            date: tx
                .recorded_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

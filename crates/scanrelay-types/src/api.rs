use serde::{Deserialize, Serialize};

/// Verification outcome derived from reactions. Wire form is exactly "Found"
/// or "NotFound"; the same strings land in the ledger's status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerifyStatus {
    Found,
    NotFound,
}

impl VerifyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VerifyStatus::Found => "Found",
            VerifyStatus::NotFound => "NotFound",
        }
    }
}

/// Payload forwarded from the normalizer to the ledger endpoint. Sent exactly
/// once per relevant update; there is no retry or dedup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPayload {
    pub barcode: String,
    pub status: VerifyStatus,
    pub user: String,
    pub chat_id: Option<i64>,
    pub message_id: Option<i64>,
}

// -- Ledger update --

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub user: String,
}

/// Ledger response body. `ok` is the signal, not the HTTP status.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UpdateOutcome {
    pub fn updated(count: usize) -> Self {
        Self { ok: true, updated: Some(count), error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { ok: false, updated: None, error: Some(error.into()) }
    }
}

// -- Sheet admin --

#[derive(Debug, Deserialize)]
pub struct SeedSheetRequest {
    pub sheet: String,
    /// Row 1 is the header row; the ledger scan skips it.
    pub rows: Vec<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_uses_camel_case_keys() {
        let payload = NormalizedPayload {
            barcode: "12345678901".into(),
            status: VerifyStatus::Found,
            user: "Anna".into(),
            chat_id: Some(-100123),
            message_id: Some(42),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["status"], "Found");
        assert_eq!(json["chatId"], -100123);
        assert_eq!(json["messageId"], 42);
    }

    #[test]
    fn outcome_omits_absent_fields() {
        let ok = serde_json::to_value(UpdateOutcome::updated(2)).unwrap();
        assert_eq!(ok, serde_json::json!({ "ok": true, "updated": 2 }));

        let err = serde_json::to_value(UpdateOutcome::failed("bad")).unwrap();
        assert_eq!(err, serde_json::json!({ "ok": false, "error": "bad" }));
    }

    #[test]
    fn update_request_tolerates_missing_fields() {
        let req: UpdateRequest = serde_json::from_str(r#"{ "barcode": "1" }"#).unwrap();
        assert_eq!(req.barcode, "1");
        assert_eq!(req.status, "");
        assert_eq!(req.user, "");
    }
}

use axum::{Json, extract::State, http::StatusCode};
use tracing::{error, info};

use scanrelay_core::barcode::extract_barcode;
use scanrelay_core::reactions::{RejectRule, analyze_reactions};
use scanrelay_types::api::NormalizedPayload;
use scanrelay_types::event::Update;

use crate::state::AppState;

/// What an inbound update normalizes to. The two empty cases are ordinary
/// traffic, acknowledged with a 200 and no side effect.
#[derive(Debug, PartialEq)]
pub enum Normalized {
    NoBarcode,
    NoRelevantReaction,
    Payload(NormalizedPayload),
}

pub fn normalize(update: &Update, rule: RejectRule) -> Normalized {
    let barcode = update
        .any_message()
        .and_then(|m| m.body())
        .and_then(extract_barcode);
    let Some(barcode) = barcode else {
        return Normalized::NoBarcode;
    };

    let Some(signal) = analyze_reactions(update, rule) else {
        return Normalized::NoRelevantReaction;
    };

    Normalized::Payload(NormalizedPayload {
        barcode: barcode.to_string(),
        status: signal.status,
        user: signal.last_reactor,
        chat_id: update.chat_id(),
        message_id: update.message_id(),
    })
}

/// POST /webhook: normalize the update and forward it in exactly one outbound
/// call. No retry, no queue; a downstream failure is the caller's 500.
pub async fn receive_update(
    State(state): State<AppState>,
    Json(update): Json<Update>,
) -> (StatusCode, &'static str) {
    let payload = match normalize(&update, state.config.reject_rule) {
        Normalized::NoBarcode => return (StatusCode::OK, "no barcode"),
        Normalized::NoRelevantReaction => return (StatusCode::OK, "no relevant reaction"),
        Normalized::Payload(payload) => payload,
    };

    info!(
        barcode = %payload.barcode,
        status = payload.status.as_str(),
        user = %payload.user,
        "forwarding normalized payload"
    );

    let sent = state
        .http
        .post(&state.config.forward_url)
        .json(&payload)
        .send()
        .await;

    match sent {
        Ok(response) if response.status().is_success() => (StatusCode::OK, "ok"),
        Ok(response) => {
            error!(status = %response.status(), "forward endpoint rejected payload");
            (StatusCode::INTERNAL_SERVER_ERROR, "error")
        }
        Err(e) => {
            error!("forward call failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanrelay_types::api::VerifyStatus;

    #[test]
    fn sample_event_normalizes_end_to_end() {
        let update: Update = serde_json::from_str(
            r#"{
                "message": {
                    "message_id": 42,
                    "chat": { "id": -100123 },
                    "text": "item 12345678901",
                    "reactions": [
                        { "emoji": "👍", "actor": { "first_name": "Anna" }, "date": 100 }
                    ]
                }
            }"#,
        )
        .unwrap();

        let Normalized::Payload(payload) = normalize(&update, RejectRule::GlyphOnly) else {
            panic!("expected a payload");
        };
        assert_eq!(payload.barcode, "12345678901");
        assert_eq!(payload.status, VerifyStatus::Found);
        assert_eq!(payload.user, "Anna");
        assert_eq!(payload.chat_id, Some(-100123));
        assert_eq!(payload.message_id, Some(42));
    }

    #[test]
    fn update_without_digits_is_no_barcode() {
        let update: Update =
            serde_json::from_str(r#"{ "message": { "text": "hello" } }"#).unwrap();
        assert_eq!(normalize(&update, RejectRule::GlyphOnly), Normalized::NoBarcode);
    }

    #[test]
    fn barcode_without_reactions_is_no_relevant_reaction() {
        let update: Update =
            serde_json::from_str(r#"{ "message": { "text": "item 12345678901" } }"#).unwrap();
        assert_eq!(
            normalize(&update, RejectRule::GlyphOnly),
            Normalized::NoRelevantReaction
        );
    }

    #[test]
    fn caption_text_feeds_extraction() {
        let update: Update = serde_json::from_str(
            r#"{ "edited_message": {
                "caption": "photo 123456789012",
                "reactions": [ { "emoji": "👎", "actor": { "username": "qa" }, "date": 1 } ]
            } }"#,
        )
        .unwrap();

        let Normalized::Payload(payload) = normalize(&update, RejectRule::GlyphOnly) else {
            panic!("expected a payload");
        };
        assert_eq!(payload.barcode, "123456789012");
        assert_eq!(payload.status, VerifyStatus::NotFound);
        assert_eq!(payload.user, "qa");
    }
}

use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::state::AppState;

pub const SECRET_HEADER: &str = "x-webhook-secret";
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// 1 MiB is far beyond any real platform update.
const BODY_LIMIT: usize = 1024 * 1024;

/// Trust model for the webhook endpoint: no check, a shared-secret header, or
/// an HMAC body signature. Always explicit configuration, never inferred.
#[derive(Debug, Clone)]
pub enum AuthPolicy {
    None,
    SharedSecret(String),
    Signature(String),
}

/// Gate /webhook according to the configured policy.
pub async fn require_webhook_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    match &state.config.auth {
        AuthPolicy::None => Ok(next.run(req).await),
        AuthPolicy::SharedSecret(secret) => {
            let provided = req
                .headers()
                .get(SECRET_HEADER)
                .and_then(|v| v.to_str().ok());
            if provided == Some(secret.as_str()) {
                Ok(next.run(req).await)
            } else {
                Err(StatusCode::UNAUTHORIZED)
            }
        }
        AuthPolicy::Signature(secret) => {
            let signature = req
                .headers()
                .get(SIGNATURE_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
                .ok_or(StatusCode::UNAUTHORIZED)?;

            // The signature covers the raw body, so buffer it and hand the
            // request back to the router with the bytes restored.
            let secret = secret.clone();
            let (parts, body) = req.into_parts();
            let bytes = to_bytes(body, BODY_LIMIT)
                .await
                .map_err(|_| StatusCode::BAD_REQUEST)?;

            if !verify_signature(&secret, &bytes, &signature) {
                return Err(StatusCode::UNAUTHORIZED);
            }

            let req = Request::from_parts(parts, Body::from(bytes));
            Ok(next.run(req).await)
        }
    }
}

/// Check a hex-encoded HMAC-SHA256 of the raw body against the header value.
fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    hex::encode(mac.finalize().into_bytes()) == signature
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        http::Request,
        middleware::from_fn_with_state,
        routing::post,
    };
    use tower::ServiceExt;

    use scanrelay_core::reactions::RejectRule;
    use scanrelay_db::Workbook;

    use super::*;
    use crate::config::Config;
    use crate::state::{AppState, AppStateInner};

    fn sign_body(secret: &str, body: &[u8]) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    fn test_state(auth: AuthPolicy) -> AppState {
        Arc::new(AppStateInner {
            workbook: Workbook::open_in_memory().unwrap(),
            http: reqwest::Client::new(),
            config: Config {
                host: "127.0.0.1".into(),
                port: 0,
                db_path: ":memory:".into(),
                forward_url: "http://127.0.0.1:9/update".into(),
                auth,
                reject_rule: RejectRule::GlyphOnly,
            },
        })
    }

    async fn accepted() -> StatusCode {
        StatusCode::OK
    }

    fn gated_router(auth: AuthPolicy) -> Router {
        let state = test_state(auth);
        Router::new()
            .route("/webhook", post(accepted))
            .layer(from_fn_with_state(state, require_webhook_auth))
    }

    fn webhook_request(headers: &[(&str, &str)], body: &'static str) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/webhook");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn none_policy_passes_everything() {
        let response = gated_router(AuthPolicy::None)
            .oneshot(webhook_request(&[], "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn shared_secret_accepts_matching_header() {
        let router = gated_router(AuthPolicy::SharedSecret("hunter2".into()));
        let response = router
            .oneshot(webhook_request(&[(SECRET_HEADER, "hunter2")], "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn shared_secret_rejects_missing_and_wrong_header() {
        let router = gated_router(AuthPolicy::SharedSecret("hunter2".into()));
        let response = router
            .clone()
            .oneshot(webhook_request(&[], "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = router
            .oneshot(webhook_request(&[(SECRET_HEADER, "guess")], "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn signature_policy_checks_the_raw_body() {
        let body = r#"{"message":{"text":"item 12345678901"}}"#;
        let good = sign_body("topsecret", body.as_bytes());

        let router = gated_router(AuthPolicy::Signature("topsecret".into()));
        let response = router
            .clone()
            .oneshot(webhook_request(&[(SIGNATURE_HEADER, good.as_str())], body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let forged = sign_body("topsecret", b"different body");
        let response = router
            .oneshot(webhook_request(&[(SIGNATURE_HEADER, forged.as_str())], body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn valid_signature_verifies() {
        let body = br#"{"message":{"text":"item 12345678901"}}"#;
        let signature = sign_body("topsecret", body);
        assert!(verify_signature("topsecret", body, &signature));
    }

    #[test]
    fn tampered_body_fails() {
        let signature = sign_body("topsecret", b"original");
        assert!(!verify_signature("topsecret", b"tampered", &signature));
    }

    #[test]
    fn wrong_secret_fails() {
        let signature = sign_body("topsecret", b"body");
        assert!(!verify_signature("other", b"body", &signature));
    }
}

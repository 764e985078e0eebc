use anyhow::{Context, Result, bail};

use scanrelay_core::reactions::RejectRule;

use crate::middleware::AuthPolicy;

/// Runtime configuration, read from the environment exactly once at startup
/// and handed to the components that need it. Handler logic never touches the
/// environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Workbook identifier: path to the SQLite file backing the ledger.
    pub db_path: String,
    /// Where the normalizer forwards its payloads.
    pub forward_url: String,
    pub auth: AuthPolicy,
    pub reject_rule: RejectRule,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("SCANRELAY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("SCANRELAY_PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .context("SCANRELAY_PORT is not a valid port")?;
        let db_path =
            std::env::var("SCANRELAY_DB_PATH").unwrap_or_else(|_| "scanrelay.db".into());
        let forward_url = std::env::var("SCANRELAY_FORWARD_URL")
            .unwrap_or_else(|_| format!("http://127.0.0.1:{port}/update"));

        let auth_mode = std::env::var("SCANRELAY_AUTH").unwrap_or_else(|_| "none".into());
        let secret = std::env::var("SCANRELAY_WEBHOOK_SECRET").ok();
        let auth = match auth_mode.as_str() {
            "none" => AuthPolicy::None,
            "shared-secret" => AuthPolicy::SharedSecret(
                secret.context("SCANRELAY_AUTH=shared-secret requires SCANRELAY_WEBHOOK_SECRET")?,
            ),
            "signature" => AuthPolicy::Signature(
                secret.context("SCANRELAY_AUTH=signature requires SCANRELAY_WEBHOOK_SECRET")?,
            ),
            other => bail!("unknown SCANRELAY_AUTH '{other}', expected none, shared-secret or signature"),
        };

        let reject_rule = match std::env::var("SCANRELAY_REJECT_RULE") {
            Ok(raw) => raw.parse::<RejectRule>()?,
            Err(_) => RejectRule::default(),
        };

        Ok(Self {
            host,
            port,
            db_path,
            forward_url,
            auth,
            reject_rule,
        })
    }
}

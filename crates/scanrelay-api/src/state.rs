use std::sync::Arc;

use scanrelay_db::Workbook;

use crate::config::Config;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub workbook: Workbook,
    pub http: reqwest::Client,
    pub config: Config,
}

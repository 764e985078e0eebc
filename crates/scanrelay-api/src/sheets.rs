use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{error, info};

use scanrelay_types::api::SeedSheetRequest;

use crate::state::AppState;

/// POST /sheets/seed: replace a sheet's contents. Operator tooling for loading
/// ledger rows.
pub async fn seed_sheet(
    State(state): State<AppState>,
    Json(req): Json<SeedSheetRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let sheet = req.sheet.trim().to_string();
    if sheet.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let row_count = req.rows.len();
    tokio::task::spawn_blocking(move || state.workbook.replace_sheet(&sheet, &req.rows))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("sheet seed failed: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    info!(rows = row_count, "sheet seeded");
    Ok(Json(serde_json::json!({ "ok": true, "rows": row_count })))
}

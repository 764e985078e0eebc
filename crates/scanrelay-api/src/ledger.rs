use axum::{Json, extract::State};
use tracing::{error, info};

use scanrelay_db::Workbook;
use scanrelay_types::api::{UpdateOutcome, UpdateRequest};

use crate::state::AppState;

// Fixed external column contract, 1-indexed.
const BARCODE_COL: usize = 2; // B
const STATUS_COL: usize = 7; // G
const USER_COL: usize = 9; // I

/// Only rows awaiting verification are eligible for update.
const PENDING_SENTINEL: &str = "PendingCheck";

/// Scan every data row of every sheet; overwrite status and user wherever the
/// barcode matches and the status column still holds the sentinel. The same
/// barcode may appear in several sheets (per-batch worksheets), so the scan
/// never stops at the first hit.
pub fn apply_update(
    workbook: &Workbook,
    barcode: &str,
    status: &str,
    user: &str,
) -> anyhow::Result<usize> {
    let mut updated = 0;

    for sheet in workbook.sheet_names()? {
        let rows = workbook.sheet_rows(&sheet)?;
        // Row 1 is the header.
        for (idx, row) in rows.iter().enumerate().skip(1) {
            let cell_barcode = row.get(BARCODE_COL - 1).map(|s| s.trim()).unwrap_or("");
            if cell_barcode.is_empty() {
                continue;
            }
            let cell_status = row.get(STATUS_COL - 1).map(|s| s.trim()).unwrap_or("");
            if cell_barcode == barcode && cell_status == PENDING_SENTINEL {
                let row_number = idx + 1;
                workbook.set_cell(&sheet, row_number, STATUS_COL, status)?;
                workbook.set_cell(&sheet, row_number, USER_COL, user)?;
                updated += 1;
            }
        }
    }

    Ok(updated)
}

/// POST /update: the ledger endpoint. Data-shape problems and scan failures
/// both come back as `{ok:false}` bodies on a 200.
pub async fn update_ledger(
    State(state): State<AppState>,
    Json(req): Json<UpdateRequest>,
) -> Json<UpdateOutcome> {
    let barcode = req.barcode.trim().to_string();
    let status = req.status.trim().to_string();
    let user = req.user.trim().to_string();

    if barcode.is_empty() || status.is_empty() {
        return Json(UpdateOutcome::failed("barcode and status are required"));
    }

    // Blocking workbook scan runs off the async runtime.
    let result = tokio::task::spawn_blocking(move || {
        apply_update(&state.workbook, &barcode, &status, &user)
    })
    .await;

    match result {
        Ok(Ok(count)) => {
            info!(updated = count, "ledger scan complete");
            Json(UpdateOutcome::updated(count))
        }
        Ok(Err(e)) => {
            error!("ledger scan failed: {:#}", e);
            Json(UpdateOutcome::failed(e.to_string()))
        }
        Err(e) => {
            error!("spawn_blocking join error: {}", e);
            Json(UpdateOutcome::failed("internal error"))
        }
    }
}

use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS cells (
            sheet   TEXT NOT NULL,
            row     INTEGER NOT NULL,
            col     INTEGER NOT NULL,
            value   TEXT NOT NULL,
            PRIMARY KEY (sheet, row, col)
        );

        CREATE INDEX IF NOT EXISTS idx_cells_sheet
            ON cells(sheet, row);
        ",
    )?;

    info!("Workbook migrations complete");
    Ok(())
}

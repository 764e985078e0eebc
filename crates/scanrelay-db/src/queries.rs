use anyhow::Result;
use rusqlite::params;

use crate::Workbook;

impl Workbook {
    pub fn sheet_names(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT DISTINCT sheet FROM cells ORDER BY sheet")?;
            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(names)
        })
    }

    /// All rows of a sheet as dense vectors, in row order. Row 1 of the sheet
    /// is element 0; rows are padded with empty strings out to their last
    /// populated column.
    pub fn sheet_rows(&self, sheet: &str) -> Result<Vec<Vec<String>>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT row, col, value FROM cells WHERE sheet = ?1 ORDER BY row, col",
            )?;
            let cells = stmt
                .query_map([sheet], |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, row.get::<_, String>(2)?))
                })?
                .collect::<Result<Vec<(i64, i64, String)>, _>>()?;

            let max_row = cells.iter().map(|(r, _, _)| *r).max().unwrap_or(0);
            let mut rows: Vec<Vec<String>> = vec![Vec::new(); max_row as usize];
            for (row, col, value) in cells {
                if row < 1 || col < 1 {
                    continue;
                }
                let dense = &mut rows[(row - 1) as usize];
                if dense.len() < col as usize {
                    dense.resize(col as usize, String::new());
                }
                dense[(col - 1) as usize] = value;
            }
            Ok(rows)
        })
    }

    pub fn set_cell(&self, sheet: &str, row: usize, col: usize, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO cells (sheet, row, col, value) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (sheet, row, col) DO UPDATE SET value = excluded.value",
                params![sheet, row as i64, col as i64, value],
            )?;
            Ok(())
        })
    }

    /// Replace a sheet's contents wholesale. Used by the seed route and tests.
    pub fn replace_sheet(&self, sheet: &str, rows: &[Vec<String>]) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM cells WHERE sheet = ?1", [sheet])?;
            let mut stmt = conn.prepare(
                "INSERT INTO cells (sheet, row, col, value) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (r, cols) in rows.iter().enumerate() {
                for (c, value) in cols.iter().enumerate() {
                    stmt.execute(params![sheet, (r + 1) as i64, (c + 1) as i64, value])?;
                }
            }
            Ok(())
        })
    }
}

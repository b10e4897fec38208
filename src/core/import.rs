//! Bulk import of vehicles from a spreadsheet.

use crate::adapters::xlsx;
use crate::core::oid::{derive_oid, OidStrategy};
use crate::domain::model::{ImportSummary, ModerationStatus, NewVehicle};
use crate::domain::ports::VehicleStore;
use crate::utils::error::{Result, ToolError};

/// One usable spreadsheet row: identifier plus license plate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    pub imei: String,
    pub plate: String,
}

/// Reads `(imei, plate)` pairs from the worksheet at `path`.
///
/// Both columns must be present in the header row, otherwise the run is
/// aborted with [`ToolError::MissingColumn`]. Rows where either cell is
/// empty are dropped, matching how operators leave gaps in the sheets
/// they send us.
pub fn read_import_rows(path: &str, imei_column: &str, plate_column: &str) -> Result<Vec<ImportRow>> {
    let range = xlsx::open_sheet(path)?;
    let mut rows = range.rows();

    let header = rows.next().ok_or_else(|| ToolError::MissingColumn {
        column: imei_column.to_string(),
    })?;
    let imei_idx = xlsx::column_index(header, imei_column).ok_or_else(|| {
        ToolError::MissingColumn {
            column: imei_column.to_string(),
        }
    })?;
    let plate_idx = xlsx::column_index(header, plate_column).ok_or_else(|| {
        ToolError::MissingColumn {
            column: plate_column.to_string(),
        }
    })?;

    let mut out = Vec::new();
    for row in rows {
        let imei = xlsx::cell_to_string(xlsx::cell(row, imei_idx));
        let plate = xlsx::cell_to_string(xlsx::cell(row, plate_idx));
        match (imei, plate) {
            (Some(imei), Some(plate))
                if !imei.trim().is_empty() && !plate.trim().is_empty() =>
            {
                out.push(ImportRow {
                    imei: imei.trim().to_string(),
                    plate: plate.trim().to_string(),
                });
            }
            _ => {}
        }
    }
    Ok(out)
}

/// Derives an OID for every row and inserts it into the store.
///
/// Per-row failures (derivation or insert) are logged with the
/// offending identifier and skipped; everything that succeeded stays
/// committed.
pub async fn run_import<S: VehicleStore>(
    store: &S,
    rows: &[ImportRow],
    strategy: &OidStrategy,
    provider_id: i32,
) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for row in rows {
        let oid = match derive_oid(&row.imei, strategy) {
            Ok(oid) => oid,
            Err(e) => {
                tracing::warn!("could not process row {} {}: {}", row.imei, row.plate, e);
                summary.skipped += 1;
                continue;
            }
        };

        let vehicle = NewVehicle {
            imei: row.imei.clone(),
            oid,
            license_plate_number: row.plate.clone(),
            provider_id,
            moderation_status: ModerationStatus::Pending,
        };

        match store.insert_vehicle(&vehicle).await {
            Ok(()) => summary.inserted += 1,
            Err(e) => {
                tracing::warn!("could not insert row {} {}: {}", row.imei, row.plate, e);
                summary.skipped += 1;
            }
        }
    }

    summary
}

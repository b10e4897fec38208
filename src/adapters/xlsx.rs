//! Thin calamine wrapper shared by the spreadsheet-reading tools.

use calamine::{open_workbook, Data, Range, Reader, Xlsx};

use crate::utils::error::{Result, ToolError};

static EMPTY_CELL: Data = Data::Empty;

/// Opens the workbook at `path` and returns the cell range of the sheet
/// named `Sheet1`, or the first sheet when no sheet carries that name.
pub fn open_sheet(path: &str) -> Result<Range<Data>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let names = workbook.sheet_names();
    let sheet = if names.iter().any(|n| n == "Sheet1") {
        "Sheet1".to_string()
    } else {
        names.first().cloned().ok_or_else(|| ToolError::Config {
            message: format!("workbook {} has no sheets", path),
        })?
    };

    let range = workbook.worksheet_range(&sheet)?;
    Ok(range)
}

/// Index of the column whose header cell equals `name`, if any.
pub fn column_index(header: &[Data], name: &str) -> Option<usize> {
    header
        .iter()
        .position(|cell| cell_to_string(cell).as_deref() == Some(name))
}

pub fn cell(row: &[Data], index: usize) -> &Data {
    row.get(index).unwrap_or(&EMPTY_CELL)
}

/// Renders a cell as text. Numeric cells with an integral value lose
/// the decimal point calamine would otherwise show (IMEI columns are
/// frequently typed as numbers by spreadsheet software).
pub fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn is_empty(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Integer-like means: an integer, a float with no fractional part, or
/// a non-empty all-digit string.
pub fn is_int_like(cell: &Data) -> bool {
    match cell {
        Data::Int(_) => true,
        Data::Float(f) => f.fract() == 0.0,
        Data::String(s) => !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_like_cells() {
        assert!(is_int_like(&Data::Int(7)));
        assert!(is_int_like(&Data::Float(7.0)));
        assert!(!is_int_like(&Data::Float(7.5)));
        assert!(is_int_like(&Data::String("12345".to_string())));
        assert!(!is_int_like(&Data::String("12a45".to_string())));
        assert!(!is_int_like(&Data::String(String::new())));
        assert!(!is_int_like(&Data::Bool(true)));
        assert!(!is_int_like(&Data::Empty));
    }

    #[test]
    fn empty_cells() {
        assert!(is_empty(&Data::Empty));
        assert!(is_empty(&Data::String("  ".to_string())));
        assert!(!is_empty(&Data::Int(0)));
        assert!(!is_empty(&Data::String("x".to_string())));
    }

    #[test]
    fn numeric_cells_render_without_decimal_point() {
        assert_eq!(
            cell_to_string(&Data::Float(864912030123456.0)).unwrap(),
            "864912030123456"
        );
        assert_eq!(cell_to_string(&Data::Int(42)).unwrap(), "42");
        assert_eq!(cell_to_string(&Data::Empty), None);
    }

    #[test]
    fn column_lookup() {
        let header = vec![
            Data::String("IMEI".to_string()),
            Data::String("Гос. номер".to_string()),
        ];
        assert_eq!(column_index(&header, "IMEI"), Some(0));
        assert_eq!(column_index(&header, "Гос. номер"), Some(1));
        assert_eq!(column_index(&header, "OID"), None);
    }
}

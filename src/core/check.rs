//! Fuzzy matching of spreadsheet IMEIs against tracked points.

use std::io;

use crate::adapters::xlsx;
use crate::core::oid::tails;
use crate::domain::model::TailMatch;
use crate::domain::ports::PointLookup;
use crate::utils::error::{Result, ToolError};

/// Reads the `IMEI` column from the worksheet at `path`, trimmed and
/// de-duplicated in first-seen order.
pub fn read_imeis(path: &str) -> Result<Vec<String>> {
    let range = xlsx::open_sheet(path)?;
    let mut rows = range.rows();

    let header = rows.next().ok_or_else(|| ToolError::MissingColumn {
        column: "IMEI".to_string(),
    })?;
    let imei_idx =
        xlsx::column_index(header, "IMEI").ok_or_else(|| ToolError::MissingColumn {
            column: "IMEI".to_string(),
        })?;

    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for row in rows {
        if let Some(imei) = xlsx::cell_to_string(xlsx::cell(row, imei_idx)) {
            let imei = imei.trim().to_string();
            if !imei.is_empty() && seen.insert(imei.clone()) {
                out.push(imei);
            }
        }
    }
    Ok(out)
}

/// For every IMEI, walks its tail candidates longest-first and records
/// the first one the lookup confirms. IMEIs with no confirmed tail get
/// an empty `client_tail`.
pub async fn find_matches<L: PointLookup>(lookup: &L, imeis: &[String]) -> Result<Vec<TailMatch>> {
    let mut out = Vec::with_capacity(imeis.len());
    for imei in imeis {
        let mut client_tail = String::new();
        for candidate in tails(imei) {
            if lookup.matches(&candidate).await? {
                client_tail = candidate.text;
                break;
            }
        }
        if client_tail.is_empty() {
            tracing::debug!("no matching tail for {}", imei);
        }
        out.push(TailMatch {
            imei: imei.clone(),
            client_tail,
        });
    }
    Ok(out)
}

/// Writes the report as CSV with an `IMEI,client_tail` header.
pub fn write_report<W: io::Write>(writer: W, matches: &[TailMatch]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for m in matches {
        csv_writer.serialize(m)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::oid::TailCandidate;
    use async_trait::async_trait;
    use std::collections::HashSet;

    struct SetLookup {
        known: HashSet<u64>,
    }

    #[async_trait]
    impl PointLookup for SetLookup {
        async fn matches(&self, tail: &TailCandidate) -> Result<bool> {
            Ok(self.known.contains(&tail.value))
        }
    }

    #[tokio::test]
    async fn picks_the_longest_matching_tail() {
        // Both 2030123456 and 123456 are known; the longer tail wins.
        let lookup = SetLookup {
            known: [2030123456, 123456].into_iter().collect(),
        };
        let matches = find_matches(&lookup, &["864912030123456".to_string()])
            .await
            .unwrap();
        assert_eq!(matches[0].client_tail, "2030123456");
    }

    #[tokio::test]
    async fn falls_through_to_shorter_tails() {
        let lookup = SetLookup {
            known: [123456].into_iter().collect(),
        };
        let matches = find_matches(&lookup, &["864912030123456".to_string()])
            .await
            .unwrap();
        assert_eq!(matches[0].client_tail, "123456");
    }

    #[tokio::test]
    async fn unmatched_imeis_get_an_empty_tail() {
        let lookup = SetLookup {
            known: HashSet::new(),
        };
        let matches = find_matches(&lookup, &["864912030123456".to_string()])
            .await
            .unwrap();
        assert_eq!(matches[0].imei, "864912030123456");
        assert_eq!(matches[0].client_tail, "");
    }

    #[test]
    fn report_is_csv_with_header() {
        let matches = vec![
            TailMatch {
                imei: "864912030123456".to_string(),
                client_tail: "2030123456".to_string(),
            },
            TailMatch {
                imei: "123".to_string(),
                client_tail: String::new(),
            },
        ];
        let mut buffer = Vec::new();
        write_report(&mut buffer, &matches).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), "IMEI,client_tail");
        assert_eq!(lines.next().unwrap(), "864912030123456,2030123456");
        assert_eq!(lines.next().unwrap(), "123,");
    }
}

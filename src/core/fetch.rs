//! Download and validation of the exported vehicle spreadsheet.

use std::collections::HashSet;
use std::io::Write;
use std::time::Duration;

use regex::Regex;
use reqwest::header::CONTENT_DISPOSITION;
use url::Url;

use crate::adapters::xlsx;
use crate::config::FetchConfig;
use crate::domain::model::EXPORT_HEADERS;
use crate::utils::error::{Result, ToolError};

const MAX_ROW_ERRORS: usize = 20;
const ERROR_PREVIEW: usize = 10;
const BODY_PREVIEW: usize = 500;

/// Appends `provider_id` / `moderation_status` filters to the export
/// URL, coping with URLs that already carry a query string.
pub fn build_url(
    base: &str,
    provider_id: Option<i32>,
    moderation_status: Option<&str>,
) -> Result<String> {
    if provider_id.is_none() && moderation_status.is_none() {
        return Ok(base.to_string());
    }

    let mut url = Url::parse(base).map_err(|e| ToolError::InvalidConfigValue {
        field: "url".to_string(),
        value: base.to_string(),
        reason: e.to_string(),
    })?;
    {
        let mut pairs = url.query_pairs_mut();
        if let Some(id) = provider_id {
            pairs.append_pair("provider_id", &id.to_string());
        }
        if let Some(status) = moderation_status {
            pairs.append_pair("moderation_status", status);
        }
    }
    Ok(url.to_string())
}

/// Extracts a filename from a Content-Disposition header, preferring
/// the RFC 5987 `filename*` form. Falls back to `vehicles.xlsx`.
pub fn pick_filename(content_disposition: Option<&str>) -> String {
    let pattern = r#"(?i)filename\*=UTF-8''([^;]+)|filename="?([^";]+)"?"#;
    if let (Some(cd), Ok(re)) = (content_disposition, Regex::new(pattern)) {
        if let Some(caps) = re.captures(cd) {
            if let Some(encoded) = caps.get(1) {
                return urlencoding::decode(encoded.as_str())
                    .map(|s| s.into_owned())
                    .unwrap_or_else(|_| encoded.as_str().to_string());
            }
            if let Some(plain) = caps.get(2) {
                return plain.as_str().trim().to_string();
            }
        }
    }
    "vehicles.xlsx".to_string()
}

/// Downloads the export to disk and returns the saved path.
///
/// Non-2xx responses become [`ToolError::HttpStatus`] with a body
/// preview; the body is streamed to the file chunk by chunk.
pub async fn download(config: &FetchConfig) -> Result<String> {
    let url = build_url(
        &config.url,
        config.provider_id,
        config.moderation_status.as_deref(),
    )?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()?;

    let mut request = client.get(&url);
    if let Some(key) = &config.api_key {
        request = request.header("X-API-Key", key);
    }

    tracing::debug!("GET {}", url);
    let mut response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ToolError::HttpStatus {
            status: status.as_u16(),
            body: body.chars().take(BODY_PREVIEW).collect(),
        });
    }

    let disposition = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let path = config
        .output
        .clone()
        .unwrap_or_else(|| pick_filename(disposition.as_deref()));

    let mut file = std::fs::File::create(&path)?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk)?;
    }
    file.flush()?;

    Ok(path)
}

/// Validates the saved workbook against the export contract.
///
/// The header row must match [`EXPORT_HEADERS`] exactly. Row checks
/// stop after 20 accumulated errors; the resulting error names the
/// total and previews the first 10. Returns the number of data rows
/// seen on success.
pub fn validate_export(path: &str, allowed_statuses: &HashSet<String>) -> Result<usize> {
    let range = xlsx::open_sheet(path)?;
    let mut rows = range.rows();

    let expected: Vec<String> = EXPORT_HEADERS.iter().map(|h| h.to_string()).collect();
    let header = rows.next().ok_or_else(|| ToolError::HeaderMismatch {
        expected: expected.clone(),
        found: Vec::new(),
    })?;
    let found: Vec<String> = header
        .iter()
        .take(EXPORT_HEADERS.len())
        .filter_map(xlsx::cell_to_string)
        .collect();
    if found != expected {
        return Err(ToolError::HeaderMismatch { expected, found });
    }

    let mut row_count = 0usize;
    let mut issues: Vec<(usize, &str)> = Vec::new();
    for (idx, row) in rows.enumerate() {
        row_count += 1;
        // 1-based spreadsheet row number, header included.
        let line = idx + 2;

        if !xlsx::is_int_like(xlsx::cell(row, 0)) {
            issues.push((line, "ID"));
        }
        if xlsx::is_empty(xlsx::cell(row, 1)) {
            issues.push((line, "IMEI"));
        }
        let oid = xlsx::cell(row, 2);
        if !xlsx::is_empty(oid) && !xlsx::is_int_like(oid) {
            issues.push((line, "OID"));
        }
        let provider = xlsx::cell(row, 4);
        if xlsx::is_empty(provider) || !xlsx::is_int_like(provider) {
            issues.push((line, "ID провайдера"));
        }
        let status = xlsx::cell_to_string(xlsx::cell(row, 5)).unwrap_or_default();
        if !allowed_statuses.contains(&status) {
            issues.push((line, "Статус модерации"));
        }

        if issues.len() >= MAX_ROW_ERRORS {
            break;
        }
    }

    if !issues.is_empty() {
        let preview = issues
            .iter()
            .take(ERROR_PREVIEW)
            .map(|(line, column)| format!("row {}: {}", line, column))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ToolError::RowValidation {
            total: issues.len(),
            preview,
        });
    }

    Ok(row_count)
}

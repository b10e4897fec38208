use std::collections::HashSet;

use fleet_tools::core::fetch::{download, validate_export};
use fleet_tools::{FetchConfig, ToolError};
use httpmock::prelude::*;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn allowed() -> HashSet<String> {
    ["pending", "approved", "rejected"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn write_export(path: &str, rows: &[(f64, &str, Option<f64>, &str, f64, &str)]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let headers = [
        "ID",
        "IMEI",
        "OID",
        "Название",
        "ID провайдера",
        "Статус модерации",
    ];
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }

    for (i, (id, imei, oid, name, provider, status)) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_number(row, 0, *id).unwrap();
        worksheet.write_string(row, 1, *imei).unwrap();
        if let Some(oid) = oid {
            worksheet.write_number(row, 2, *oid).unwrap();
        }
        worksheet.write_string(row, 3, *name).unwrap();
        worksheet.write_number(row, 4, *provider).unwrap();
        worksheet.write_string(row, 5, *status).unwrap();
    }

    workbook.save(path).unwrap();
}

fn fetch_config(url: String, output: String) -> FetchConfig {
    FetchConfig {
        url,
        output: Some(output),
        api_key: None,
        provider_id: None,
        moderation_status: None,
        timeout: 30,
        save_only: false,
        allowed_status: "pending,approved,rejected".to_string(),
        verbose: false,
    }
}

#[tokio::test]
async fn downloads_and_validates_a_clean_export() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = temp_dir.path().join("export.xlsx");
    write_export(
        fixture.to_str().unwrap(),
        &[
            (1.0, "864912030123456", Some(2030123456.0), "Car A", 7.0, "pending"),
            (2.0, "005345678901", None, "Car B", 7.0, "approved"),
        ],
    );
    let body = std::fs::read(&fixture).unwrap();

    let server = MockServer::start();
    let export_mock = server.mock(|when, then| {
        when.method(GET).path("/vehicles/export");
        then.status(200)
            .header("content-type", "application/vnd.ms-excel")
            .body(&body);
    });

    let output = temp_dir.path().join("saved.xlsx");
    let config = fetch_config(
        server.url("/vehicles/export"),
        output.to_str().unwrap().to_string(),
    );

    let path = download(&config).await.unwrap();
    export_mock.assert();
    assert_eq!(path, output.to_str().unwrap());

    let rows = validate_export(&path, &allowed()).unwrap();
    assert_eq!(rows, 2);
}

#[tokio::test]
async fn query_filters_and_api_key_are_sent() {
    let temp_dir = TempDir::new().unwrap();
    let fixture = temp_dir.path().join("export.xlsx");
    write_export(
        fixture.to_str().unwrap(),
        &[(1.0, "864912030123456", None, "Car", 7.0, "pending")],
    );
    let body = std::fs::read(&fixture).unwrap();

    let server = MockServer::start();
    let export_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/vehicles/export")
            .query_param("provider_id", "7")
            .query_param("moderation_status", "pending")
            .header("X-API-Key", "s3cret");
        then.status(200).body(&body);
    });

    let output = temp_dir.path().join("saved.xlsx");
    let mut config = fetch_config(
        server.url("/vehicles/export"),
        output.to_str().unwrap().to_string(),
    );
    config.api_key = Some("s3cret".to_string());
    config.provider_id = Some(7);
    config.moderation_status = Some("pending".to_string());

    let path = download(&config).await.unwrap();
    export_mock.assert();
    assert!(validate_export(&path, &allowed()).is_ok());
}

#[tokio::test]
async fn non_2xx_response_is_an_http_error() {
    let server = MockServer::start();
    let error_mock = server.mock(|when, then| {
        when.method(GET).path("/vehicles/export");
        then.status(503).body("maintenance window");
    });

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("saved.xlsx");
    let config = fetch_config(
        server.url("/vehicles/export"),
        output.to_str().unwrap().to_string(),
    );

    let err = download(&config).await.unwrap_err();
    error_mock.assert();
    match err {
        ToolError::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("maintenance"));
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn header_mismatch_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad_header.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, header) in ["ID", "IMEI", "OID", "Name", "Provider", "Status"]
        .iter()
        .enumerate()
    {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    workbook.save(path.to_str().unwrap()).unwrap();

    let err = validate_export(path.to_str().unwrap(), &allowed()).unwrap_err();
    assert!(matches!(err, ToolError::HeaderMismatch { .. }));
}

#[test]
fn unknown_status_is_a_row_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad_status.xlsx");
    write_export(
        path.to_str().unwrap(),
        &[(1.0, "123456789012345", None, "Car", 7.0, "unknown")],
    );

    let err = validate_export(path.to_str().unwrap(), &allowed()).unwrap_err();
    match err {
        ToolError::RowValidation { total, preview } => {
            assert_eq!(total, 1);
            assert!(preview.contains("row 2: Статус модерации"));
        }
        other => panic!("expected RowValidation, got {:?}", other),
    }
}

#[test]
fn row_errors_stop_at_twenty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("many_errors.xlsx");

    // 30 rows, each contributing one bad status.
    let rows: Vec<(f64, &str, Option<f64>, &str, f64, &str)> = (0..30)
        .map(|i| ((i + 1) as f64, "864912030123456", None, "Car", 7.0, "bogus"))
        .collect();
    write_export(path.to_str().unwrap(), &rows);

    let err = validate_export(path.to_str().unwrap(), &allowed()).unwrap_err();
    match err {
        ToolError::RowValidation { total, preview } => {
            assert_eq!(total, 20);
            // Preview names at most ten rows.
            assert_eq!(preview.matches("row ").count(), 10);
        }
        other => panic!("expected RowValidation, got {:?}", other),
    }
}

#[test]
fn missing_id_and_empty_imei_are_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad_cells.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, header) in [
        "ID",
        "IMEI",
        "OID",
        "Название",
        "ID провайдера",
        "Статус модерации",
    ]
    .iter()
    .enumerate()
    {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    // ID is text, IMEI empty, OID non-numeric.
    worksheet.write_string(1, 0, "one").unwrap();
    worksheet.write_string(1, 2, "n/a").unwrap();
    worksheet.write_string(1, 3, "Car").unwrap();
    worksheet.write_number(1, 4, 7.0).unwrap();
    worksheet.write_string(1, 5, "pending").unwrap();
    workbook.save(path.to_str().unwrap()).unwrap();

    let err = validate_export(path.to_str().unwrap(), &allowed()).unwrap_err();
    match err {
        ToolError::RowValidation { total, preview } => {
            assert_eq!(total, 3);
            assert!(preview.contains("row 2: ID"));
            assert!(preview.contains("row 2: IMEI"));
            assert!(preview.contains("row 2: OID"));
        }
        other => panic!("expected RowValidation, got {:?}", other),
    }
}

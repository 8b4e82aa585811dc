// tests/api_client.rs

use chrono::NaiveDate;
use scan_console::config::ClientConfig;
use scan_console::core::api::ApiClient;
use scan_console::core::error::ApiError;
use scan_console::core::models::{ScanConfig, ScanType};
use scan_console::core::options;
use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(server: &MockServer, prefix: &str) -> ApiClient {
    let config = ClientConfig {
        base_url: server.uri(),
        api_prefix: prefix.to_string(),
        ..ClientConfig::default()
    };
    ApiClient::new(&config).unwrap()
}

#[tokio::test]
async fn start_scan_posts_compiled_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/escanear"))
        .and(body_json(json!({
            "host": "192.168.1.10",
            "puerto": "22,80",
            "scripts": "default",
            "tipo": "stealth",
            "argumentos": "-sS -T4 -f"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Escaneo iniciado"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = ScanConfig::default();
    options::apply_preset(&mut config, ScanType::Stealth);
    config.host = " 192.168.1.10 ".to_string();
    config.ports = "22,80".to_string();
    config.fragmentation = true;

    let api = client_for(&server, "/api");
    let ack = api.start_scan(&options::build_request(&config)).await.unwrap();
    assert!(ack.success);
    assert_eq!(ack.message.as_deref(), Some("Escaneo iniciado"));
}

#[tokio::test]
async fn rejected_start_carries_service_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/escanear"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            json!({"success": false, "message": "Ya hay un escaneo en progreso"}),
        ))
        .mount(&server)
        .await;

    let api = client_for(&server, "/api");
    let request = options::build_request(&ScanConfig { host: "h".into(), ..ScanConfig::default() });
    match api.start_scan(&request).await {
        Err(ApiError::Rejected(message)) => assert_eq!(message, "Ya hay un escaneo en progreso"),
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn unprefixed_service_variant_is_supported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/estado"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"en_progreso": true, "mensaje": "Ejecutando escaneo...", "ultimo_reporte": null}),
        ))
        .mount(&server)
        .await;

    let api = client_for(&server, "");
    let status = api.status().await.unwrap();
    assert!(status.in_progress);
    assert_eq!(status.message(), Some("Ejecutando escaneo..."));
}

#[tokio::test]
async fn status_error_envelope_is_not_an_idle_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/estado"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let api = client_for(&server, "/api");
    assert!(matches!(api.status().await, Err(ApiError::Status { status: 500 })));
}

#[tokio::test]
async fn unreachable_service_is_a_connectivity_error() {
    let config = ClientConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        ..ClientConfig::default()
    };
    let api = ApiClient::new(&config).unwrap();
    let err = api.health().await.unwrap_err();
    assert!(err.is_connectivity(), "{err:?}");
}

#[tokio::test]
async fn list_reports_reads_both_id_and_name_keyed_entries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reportes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "total": 2,
            "reportes": [
                {"id": "a1", "nombre": "escaneo_20250101_120000", "fecha": "2025-01-01 12:00:00",
                 "host": "10.0.0.1", "puerto": "80", "tipo": "basico", "tamaño": 1536},
                {"nombre": "escaneo_20240101_000000.txt", "fecha": "2024-01-01 00:00:00", "tamaño": 10}
            ]
        })))
        .mount(&server)
        .await;

    let api = client_for(&server, "/api");
    let reports = api.list_reports().await.unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].key(), "a1");
    assert_eq!(reports[0].scan_type.as_deref(), Some("basico"));
    assert_eq!(reports[0].size_kb(), 1.5);
    assert_eq!(reports[1].key(), "escaneo_20240101_000000.txt");
}

#[tokio::test]
async fn missing_report_content_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reportes/zzz/contenido"))
        .respond_with(ResponseTemplate::new(404).set_body_json(
            json!({"success": false, "message": "Reporte no encontrado"}),
        ))
        .mount(&server)
        .await;

    let api = client_for(&server, "/api");
    match api.report_content("zzz").await {
        Err(ApiError::Rejected(message)) => assert_eq!(message, "Reporte no encontrado"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn download_uses_content_disposition_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reportes/a1/descargar"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=\"escaneo_20250101_120000.txt\"")
                .set_body_string("Nmap scan report for 10.0.0.1"),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let api = client_for(&server, "/api");
    let saved = api.download_report("a1", dir.path()).await.unwrap();
    assert_eq!(saved, dir.path().join("escaneo_20250101_120000.txt"));
    assert_eq!(std::fs::read_to_string(saved).unwrap(), "Nmap scan report for 10.0.0.1");
}

#[tokio::test]
async fn download_without_header_falls_back_to_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reportes/a1/descargar"))
        .respond_with(ResponseTemplate::new(200).set_body_string("body"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let api = client_for(&server, "/api");
    let saved = api.download_report("a1", dir.path()).await.unwrap();
    assert_eq!(saved.file_name().unwrap(), "a1.txt");
}

#[tokio::test]
async fn export_is_saved_with_dated_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reportes/exportar"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/zip")
                .set_body_bytes(vec![0x50, 0x4b, 0x03, 0x04]),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let api = client_for(&server, "/api");
    let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let saved = api.export_reports(dir.path(), date).await.unwrap();
    assert_eq!(saved, dir.path().join("reportes_2025-06-01.zip"));
    assert_eq!(std::fs::read(saved).unwrap(), vec![0x50, 0x4b, 0x03, 0x04]);
}

#[tokio::test]
async fn export_failure_surfaces_envelope_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/reportes/exportar"))
        .respond_with(ResponseTemplate::new(404).set_body_json(
            json!({"success": false, "message": "No hay reportes para exportar"}),
        ))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let api = client_for(&server, "/api");
    let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    match api.export_reports(dir.path(), date).await {
        Err(ApiError::Rejected(message)) => assert_eq!(message, "No hay reportes para exportar"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(!dir.path().join("reportes_2025-06-01.zip").exists());
}

#[tokio::test]
async fn delete_and_clear_hit_their_endpoints() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/reportes/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"success": true, "message": "Reporte eliminado correctamente"}),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/reportes/limpiar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"success": true, "message": "Se eliminaron 3 reportes"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, "/api");
    let deleted = api.delete_report("a1").await.unwrap();
    assert_eq!(deleted.message.as_deref(), Some("Reporte eliminado correctamente"));
    let cleared = api.clear_reports().await.unwrap();
    assert_eq!(cleared.message.as_deref(), Some("Se eliminaron 3 reportes"));
}

#[tokio::test]
async fn requests_identify_the_client() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .and(header("user-agent", concat!("scan-console/", env!("CARGO_PKG_VERSION"))))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"status": "healthy", "reportes_en_memoria": 4}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, "/api");
    let info = api.health().await.unwrap();
    assert_eq!(info.reports_in_memory, Some(4));
}

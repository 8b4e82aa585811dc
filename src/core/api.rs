// src/core/api.rs

//! Typed client for the remote scan service's HTTP JSON interface.

use crate::config::ClientConfig;
use crate::core::error::{ApiError, ApiResult};
use crate::core::models::{
    Ack, HealthInfo, ReportContent, ReportList, ReportSummary, ScanRequest, ScanStatusSnapshot,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use url::Url;

const USER_AGENT: &str = concat!("scan-console/", env!("CARGO_PKG_VERSION"));

static RE_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"filename\*?=(?:UTF-8'')?"?([^";]+)"?"#).unwrap());

/// File name used for the archive returned by `/reportes/exportar`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("reportes_{}.zip", date.format("%Y-%m-%d"))
}

/// Extracts a safe file name from a `Content-Disposition` header value.
/// Any directory components are stripped.
pub fn attachment_file_name(header: &str) -> Option<String> {
    let raw = RE_FILENAME.captures(header)?.get(1)?.as_str().trim();
    Path::new(raw)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && *n != "..")
        .map(String::from)
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    root: Url,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ApiError::Transport)?;

        let mut root = Url::parse(&config.base_url)?;
        if root.cannot_be_a_base() {
            return Err(ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        if let Ok(mut segments) = root.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(config.api_prefix.split('/').filter(|s| !s.is_empty()));
        }
        debug!(root = %root, "API client created.");
        Ok(Self { http, root })
    }

    /// Builds the URL for an endpoint below the API root. Each segment is
    /// percent-encoded, so report identifiers cannot escape their path.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn health(&self) -> ApiResult<HealthInfo> {
        let response = self.http.get(self.endpoint(&["health"])).send().await?;
        require_success(&response)?;
        read_json(response).await
    }

    pub async fn start_scan(&self, request: &ScanRequest) -> ApiResult<Ack> {
        info!(host = %request.host, ports = %request.ports, args = ?request.arguments, "Requesting scan start.");
        let response = self
            .http
            .post(self.endpoint(&["escanear"]))
            .json(request)
            .send()
            .await?;
        accept(read_json(response).await?, "No se pudo iniciar el escaneo")
    }

    pub async fn stop_scan(&self) -> ApiResult<Ack> {
        info!("Requesting scan stop.");
        let response = self.http.post(self.endpoint(&["detener"])).send().await?;
        accept(read_json(response).await?, "No se pudo detener el escaneo")
    }

    pub async fn status(&self) -> ApiResult<ScanStatusSnapshot> {
        let response = self.http.get(self.endpoint(&["estado"])).send().await?;
        // An error envelope would otherwise decode as an idle snapshot.
        require_success(&response)?;
        read_json(response).await
    }

    pub async fn list_reports(&self) -> ApiResult<Vec<ReportSummary>> {
        let response = self.http.get(self.endpoint(&["reportes"])).send().await?;
        let list: ReportList = read_json(response).await?;
        if !list.success {
            return Err(ApiError::Rejected(
                list.message.unwrap_or_else(|| "Error al listar reportes".to_string()),
            ));
        }
        debug!(count = list.reports.len(), total = ?list.total, "Report list received.");
        Ok(list.reports)
    }

    pub async fn report_content(&self, id: &str) -> ApiResult<ReportContent> {
        let response = self
            .http
            .get(self.endpoint(&["reportes", id, "contenido"]))
            .send()
            .await?;
        let content: ReportContent = read_json(response).await?;
        if !content.success {
            return Err(ApiError::Rejected(
                content.message.unwrap_or_else(|| "Reporte no encontrado".to_string()),
            ));
        }
        Ok(content)
    }

    /// Downloads a report file into `dir`, naming it after the server's
    /// `Content-Disposition` header, or `<id>.txt` when there is none.
    pub async fn download_report(&self, id: &str, dir: &Path) -> ApiResult<PathBuf> {
        let response = self
            .http
            .get(self.endpoint(&["reportes", id, "descargar"]))
            .send()
            .await?;
        let response = fail_with_envelope(response, "Error al descargar reporte").await?;

        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(attachment_file_name)
            .unwrap_or_else(|| format!("{}.txt", sanitize_id(id)));

        let bytes = response.bytes().await?;
        save(dir, &file_name, &bytes).await
    }

    pub async fn delete_report(&self, id: &str) -> ApiResult<Ack> {
        info!(report_id = id, "Deleting report.");
        let response = self.http.delete(self.endpoint(&["reportes", id])).send().await?;
        accept(read_json(response).await?, "Error al eliminar reporte")
    }

    pub async fn clear_reports(&self) -> ApiResult<Ack> {
        info!("Deleting all reports.");
        let response = self
            .http
            .delete(self.endpoint(&["reportes", "limpiar"]))
            .send()
            .await?;
        accept(read_json(response).await?, "Error al limpiar reportes")
    }

    /// Saves the export archive into `dir` as `reportes_<date>.zip`.
    pub async fn export_reports(&self, dir: &Path, date: NaiveDate) -> ApiResult<PathBuf> {
        let response = self
            .http
            .get(self.endpoint(&["reportes", "exportar"]))
            .send()
            .await?;
        let response = fail_with_envelope(response, "Error al exportar").await?;
        let bytes = response.bytes().await?;
        save(dir, &export_file_name(date), &bytes).await
    }
}

fn require_success(response: &Response) -> ApiResult<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        warn!(url = %response.url(), status = %status, "Service answered with an error status.");
        Err(ApiError::Status { status: status.as_u16() })
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    let url = response.url().clone();
    let body = response.text().await?;
    serde_json::from_str::<T>(&body).map_err(|e| {
        error!(url = %url, status = %status, error = %e, "Could not decode service response.");
        if status.is_success() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Status { status: status.as_u16() }
        }
    })
}

fn accept(ack: Ack, fallback: &str) -> ApiResult<Ack> {
    if ack.success {
        Ok(ack)
    } else {
        Err(ApiError::Rejected(ack.message.unwrap_or_else(|| fallback.to_string())))
    }
}

/// Passes 2xx responses through; otherwise surfaces the JSON envelope's
/// message when there is one.
async fn fail_with_envelope(response: Response, fallback: &str) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Ack>(&body)
        .ok()
        .and_then(|ack| ack.message)
        .unwrap_or_else(|| fallback.to_string());
    if status == StatusCode::NOT_FOUND {
        warn!(status = %status, "Requested report does not exist.");
    }
    Err(ApiError::Rejected(message))
}

fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect()
}

async fn save(dir: &Path, file_name: &str, bytes: &[u8]) -> ApiResult<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes).await?;
    info!(path = %path.display(), bytes = bytes.len(), "File saved.");
    Ok(path)
}

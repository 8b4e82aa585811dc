// src/core/models.rs

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

// --- Form Model ---

/// Named scan presets offered by the form. The serialized names are the
/// values the remote service expects in the `tipo` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum ScanType {
    #[strum(serialize = "basico")]
    Basic,
    #[strum(serialize = "stealth")]
    Stealth,
    #[strum(serialize = "udp")]
    Udp,
    #[strum(serialize = "completo")]
    Full,
    #[strum(serialize = "rapido")]
    Fast,
    #[strum(serialize = "intensivo")]
    Intensive,
    #[strum(serialize = "vuln")]
    Vuln,
    #[strum(serialize = "personalizado")]
    Custom,
}

impl ScanType {
    /// Human-readable label used by the form widget.
    pub fn label(&self) -> &'static str {
        match self {
            ScanType::Basic => "Básico (TCP connect)",
            ScanType::Stealth => "Sigiloso (SYN)",
            ScanType::Udp => "UDP",
            ScanType::Full => "Completo (TCP + UDP)",
            ScanType::Fast => "Rápido (1000 puertos principales)",
            ScanType::Intensive => "Intensivo (agresivo)",
            ScanType::Vuln => "Vulnerabilidades",
            ScanType::Custom => "Personalizado",
        }
    }

    /// Returns the variant after `self`, wrapping around at the end.
    pub fn next(&self) -> Self {
        let all: Vec<ScanType> = ScanType::iter().collect();
        let idx = all.iter().position(|t| t == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(&self) -> Self {
        let all: Vec<ScanType> = ScanType::iter().collect();
        let idx = all.iter().position(|t| t == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

/// Timing template, rendered as `-T<n>` by the option compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
pub enum ScanSpeed {
    #[strum(serialize = "T0")]
    Paranoid,
    #[strum(serialize = "T1")]
    Sneaky,
    #[strum(serialize = "T2")]
    Polite,
    #[strum(serialize = "T3")]
    Normal,
    #[default]
    #[strum(serialize = "T4")]
    Aggressive,
    #[strum(serialize = "T5")]
    Insane,
}

impl ScanSpeed {
    pub fn label(&self) -> &'static str {
        match self {
            ScanSpeed::Paranoid => "T0 Paranoico",
            ScanSpeed::Sneaky => "T1 Sigiloso",
            ScanSpeed::Polite => "T2 Educado",
            ScanSpeed::Normal => "T3 Normal",
            ScanSpeed::Aggressive => "T4 Agresivo",
            ScanSpeed::Insane => "T5 Extremo",
        }
    }

    pub fn next(&self) -> Self {
        let all: Vec<ScanSpeed> = ScanSpeed::iter().collect();
        let idx = all.iter().position(|s| s == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(&self) -> Self {
        let all: Vec<ScanSpeed> = ScanSpeed::iter().collect();
        let idx = all.iter().position(|s| s == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

/// NSE script selections offered by the form, in display order.
pub const SCRIPT_PRESETS: &[&str] = &[
    "http-headers,http-title",
    "http-headers,http-title,http-methods",
    "ssh-hostkey,ssh2-enum-algos",
    "smb-os-discovery,smb-security-mode",
    "ftp-anon,ftp-bounce",
    "default",
    "vuln",
    "discovery",
];

pub const DEFAULT_PORTS: &str = "5000";
pub const DEFAULT_SCRIPTS: &str = "http-headers,http-title";

/// Everything the operator chose in the scan form.
///
/// `scan_type` is `None` when the form carried a type name the client does
/// not recognise; the option compiler then emits no type token at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub host: String,
    pub ports: String,
    pub scripts: String,
    pub scan_type: Option<ScanType>,
    pub speed: ScanSpeed,
    pub os_detection: bool,
    pub version_detection: bool,
    pub fragmentation: bool,
    pub firewall_evasion: bool,
    pub extra_args: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            ports: DEFAULT_PORTS.to_string(),
            scripts: DEFAULT_SCRIPTS.to_string(),
            scan_type: Some(ScanType::Basic),
            speed: ScanSpeed::default(),
            os_detection: false,
            version_detection: false,
            fragmentation: false,
            firewall_evasion: false,
            extra_args: String::new(),
        }
    }
}

impl ScanConfig {
    /// Sets the scan type from its wire name. Unknown names are kept as `None`.
    pub fn set_scan_type_name(&mut self, name: &str) {
        self.scan_type = name.parse::<ScanType>().ok();
    }
}

// --- Wire Models ---

/// Body of `POST /escanear`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScanRequest {
    pub host: String,
    #[serde(rename = "puerto")]
    pub ports: String,
    pub scripts: String,
    #[serde(rename = "tipo", skip_serializing_if = "Option::is_none")]
    pub scan_type: Option<String>,
    #[serde(rename = "argumentos", skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

/// Generic `{ success, message }` envelope used by start, stop, delete and clear.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `GET /estado`. Produced by the service, never mutated locally.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ScanStatusSnapshot {
    #[serde(rename = "en_progreso", default)]
    pub in_progress: bool,
    #[serde(rename = "mensaje", default)]
    pub message: Option<String>,
    #[serde(rename = "ultimo_reporte", default)]
    pub last_report: Option<String>,
}

impl ScanStatusSnapshot {
    /// The status message, treating an empty string as absent.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }

    pub fn report_id(&self) -> Option<&str> {
        self.last_report.as_deref().filter(|r| !r.is_empty())
    }
}

/// One entry of `GET /reportes`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ReportSummary {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "fecha", default)]
    pub created_at: String,
    #[serde(default)]
    pub host: String,
    #[serde(rename = "puerto", default)]
    pub ports: String,
    #[serde(rename = "tipo", default)]
    pub scan_type: Option<String>,
    #[serde(default)]
    pub scripts: Option<String>,
    #[serde(rename = "tamaño", default)]
    pub size: u64,
}

impl ReportSummary {
    pub fn size_kb(&self) -> f64 {
        self.size as f64 / 1024.0
    }

    /// Report identifier used in URLs. The file-backed service variant has
    /// no `id` and addresses reports by name instead.
    pub fn key(&self) -> &str {
        if self.id.is_empty() { &self.name } else { &self.id }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportList {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "reportes", default)]
    pub reports: Vec<ReportSummary>,
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `GET /reportes/{id}/contenido`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ReportContent {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "fecha", default)]
    pub created_at: String,
    #[serde(default)]
    pub host: String,
    #[serde(rename = "puerto", default)]
    pub ports: String,
    #[serde(default)]
    pub scripts: Option<String>,
    #[serde(rename = "tipo", default)]
    pub scan_type: Option<String>,
    #[serde(rename = "contenido", default)]
    pub content: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct HealthInfo {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "reportes_en_memoria", default)]
    pub reports_in_memory: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_type_round_trips_wire_names() {
        assert_eq!("intensivo".parse::<ScanType>().unwrap(), ScanType::Intensive);
        assert_eq!(ScanType::Full.to_string(), "completo");
        assert!("turbo".parse::<ScanType>().is_err());
    }

    #[test]
    fn unknown_type_name_is_kept_as_none() {
        let mut config = ScanConfig::default();
        config.set_scan_type_name("turbo");
        assert_eq!(config.scan_type, None);
        config.set_scan_type_name("rapido");
        assert_eq!(config.scan_type, Some(ScanType::Fast));
    }

    #[test]
    fn cycling_wraps_around() {
        assert_eq!(ScanType::Custom.next(), ScanType::Basic);
        assert_eq!(ScanType::Basic.prev(), ScanType::Custom);
        assert_eq!(ScanSpeed::Insane.next(), ScanSpeed::Paranoid);
        assert_eq!(ScanSpeed::default().to_string(), "T4");
    }

    #[test]
    fn form_labels_are_in_spanish() {
        assert_eq!(ScanType::Basic.label(), "Básico (TCP connect)");
        assert_eq!(ScanType::Custom.label(), "Personalizado");
        assert_eq!(ScanSpeed::Polite.label(), "T2 Educado");
        assert_eq!(ScanSpeed::Aggressive.label(), "T4 Agresivo");
    }

    #[test]
    fn status_with_empty_fields_has_no_message_or_report() {
        let status: ScanStatusSnapshot =
            serde_json::from_str(r#"{"en_progreso": false, "mensaje": "", "ultimo_reporte": null}"#)
                .unwrap();
        assert!(!status.in_progress);
        assert_eq!(status.message(), None);
        assert_eq!(status.report_id(), None);
    }

    #[test]
    fn report_summary_reads_spanish_fields() {
        let json = r#"{
            "id": "abc", "nombre": "escaneo_20250101_120000", "fecha": "2025-01-01 12:00:00",
            "host": "10.0.0.1", "puerto": "80", "scripts": "default", "tamaño": 2048
        }"#;
        let report: ReportSummary = serde_json::from_str(json).unwrap();
        assert_eq!(report.key(), "abc");
        assert_eq!(report.size_kb(), 2.0);
        assert_eq!(report.scan_type, None);
    }

    #[test]
    fn file_backed_report_is_keyed_by_name() {
        let report: ReportSummary =
            serde_json::from_str(r#"{"nombre": "escaneo_1.txt", "fecha": "x", "tamaño": 10}"#).unwrap();
        assert_eq!(report.key(), "escaneo_1.txt");
    }

    #[test]
    fn scan_request_omits_absent_optionals() {
        let request = ScanRequest {
            host: "h".into(),
            ports: "80".into(),
            scripts: "default".into(),
            scan_type: None,
            arguments: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, serde_json::json!({"host": "h", "puerto": "80", "scripts": "default"}));
    }
}

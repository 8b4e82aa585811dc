// src/core/options.rs

//! Translates a [`ScanConfig`] into the argument string handed to the remote
//! scan tool, plus the field presets the form applies when a scan type is
//! picked.
//!
//! Token order is significant for the scan tool and is fixed:
//! type tokens, timing, detection/evasion flags, then free-form extras.

use crate::core::models::{ScanConfig, ScanRequest, ScanType, DEFAULT_PORTS};
use tracing::debug;

/// Number of ports requested by the `fast` preset.
pub const FAST_TOP_PORTS: &str = "1000";
/// Decoy list used when firewall evasion is enabled.
pub const DECOY_SPEC: &str = "RND:10";
/// Port list the UDP preset substitutes for the default port.
pub const UDP_PORTS: &str = "53,67,68,69,123,161,162,500,514,520,631,1434,1900,4500,5353";

fn type_tokens(scan_type: Option<ScanType>) -> &'static [&'static str] {
    match scan_type {
        Some(ScanType::Basic) => &["-sT"],
        Some(ScanType::Stealth) => &["-sS"],
        Some(ScanType::Udp) => &["-sU"],
        Some(ScanType::Full) => &["-sS", "-sU"],
        Some(ScanType::Fast) => &["-sS", "--top-ports", FAST_TOP_PORTS],
        Some(ScanType::Intensive) => &["-sS", "-A"],
        // Vulnerability scripts travel in the `scripts` field.
        Some(ScanType::Vuln) => &["-sS"],
        Some(ScanType::Custom) | None => &[],
    }
}

/// Compiles the configuration into an ordered token list.
///
/// Never fails: invalid combinations are passed through and left for the
/// remote service to reject.
pub fn compile_tokens(config: &ScanConfig) -> Vec<String> {
    let mut tokens: Vec<String> = type_tokens(config.scan_type)
        .iter()
        .map(|t| t.to_string())
        .collect();

    tokens.push(format!("-{}", config.speed));

    let forced = config.scan_type == Some(ScanType::Intensive);
    if config.os_detection || forced {
        tokens.push("-O".to_string());
    }
    if config.version_detection || forced {
        tokens.push("-sV".to_string());
    }
    if config.fragmentation {
        tokens.push("-f".to_string());
    }
    if config.firewall_evasion {
        tokens.push("-D".to_string());
        tokens.push(DECOY_SPEC.to_string());
    }

    tokens.extend(config.extra_args.split_whitespace().map(String::from));

    debug!(tokens = ?tokens, "Compiled scan arguments.");
    tokens
}

/// Same as [`compile_tokens`], joined with single spaces.
pub fn compile_arguments(config: &ScanConfig) -> String {
    compile_tokens(config).join(" ")
}

/// Builds the `POST /escanear` body for a configuration.
pub fn build_request(config: &ScanConfig) -> ScanRequest {
    ScanRequest {
        host: config.host.trim().to_string(),
        ports: config.ports.trim().to_string(),
        scripts: config.scripts.clone(),
        scan_type: config.scan_type.map(|t| t.to_string()),
        arguments: Some(compile_arguments(config)),
    }
}

/// Applies the field preset tied to a scan type, as the form does when the
/// operator picks one. Returns `true` when the advanced-options section
/// should be toggled.
pub fn apply_preset(config: &mut ScanConfig, scan_type: ScanType) -> bool {
    config.scan_type = Some(scan_type);
    match scan_type {
        ScanType::Basic => config.scripts = "http-headers,http-title".to_string(),
        ScanType::Stealth | ScanType::Full => config.scripts = "default".to_string(),
        ScanType::Udp => {
            config.scripts = "discovery".to_string();
            if config.ports == DEFAULT_PORTS {
                config.ports = UDP_PORTS.to_string();
            }
        }
        ScanType::Fast => {
            config.scripts = "default".to_string();
            config.ports = format!("--top-ports {}", FAST_TOP_PORTS);
        }
        ScanType::Intensive => {
            config.scripts = "default".to_string();
            config.os_detection = true;
            config.version_detection = true;
        }
        ScanType::Vuln => config.scripts = "vuln".to_string(),
        ScanType::Custom => return true,
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ScanSpeed;

    fn config_of(scan_type: Option<ScanType>) -> ScanConfig {
        ScanConfig { scan_type, ..ScanConfig::default() }
    }

    #[test]
    fn each_type_emits_its_tokens_then_timing() {
        let cases: &[(Option<ScanType>, &str)] = &[
            (Some(ScanType::Basic), "-sT -T4"),
            (Some(ScanType::Stealth), "-sS -T4"),
            (Some(ScanType::Udp), "-sU -T4"),
            (Some(ScanType::Full), "-sS -sU -T4"),
            (Some(ScanType::Fast), "-sS --top-ports 1000 -T4"),
            (Some(ScanType::Intensive), "-sS -A -T4 -O -sV"),
            (Some(ScanType::Vuln), "-sS -T4"),
            (Some(ScanType::Custom), "-T4"),
            (None, "-T4"),
        ];
        for (scan_type, expected) in cases {
            assert_eq!(compile_arguments(&config_of(*scan_type)), *expected, "{:?}", scan_type);
        }
    }

    #[test]
    fn fast_ignores_the_port_field() {
        let mut config = config_of(Some(ScanType::Fast));
        config.ports = "22,80".to_string();
        let tokens = compile_tokens(&config);
        assert_eq!(&tokens[..3], &["-sS", "--top-ports", "1000"]);
        assert!(!tokens.iter().any(|t| t.contains("22,80")));
    }

    #[test]
    fn flags_follow_fixed_order() {
        let config = ScanConfig {
            scan_type: Some(ScanType::Stealth),
            speed: ScanSpeed::Polite,
            os_detection: true,
            version_detection: true,
            fragmentation: true,
            firewall_evasion: true,
            extra_args: "--reason   -Pn".to_string(),
            ..ScanConfig::default()
        };
        assert_eq!(
            compile_tokens(&config),
            vec!["-sS", "-T2", "-O", "-sV", "-f", "-D", "RND:10", "--reason", "-Pn"]
        );
    }

    #[test]
    fn intensive_forces_detection_flags_without_checkboxes() {
        let config = config_of(Some(ScanType::Intensive));
        assert!(!config.os_detection && !config.version_detection);
        let tokens = compile_tokens(&config);
        for flag in ["-A", "-O", "-sV"] {
            assert!(tokens.iter().any(|t| t == flag), "missing {flag}");
        }
        // Forced flags are not duplicated when the boxes are also ticked.
        let ticked = ScanConfig { os_detection: true, version_detection: true, ..config };
        assert_eq!(compile_tokens(&ticked).iter().filter(|t| *t == "-O").count(), 1);
    }

    #[test]
    fn blank_extra_args_contribute_nothing() {
        let mut config = config_of(Some(ScanType::Basic));
        config.extra_args = "   ".to_string();
        assert_eq!(compile_tokens(&config), vec!["-sT", "-T4"]);
    }

    #[test]
    fn extra_args_are_not_escaped() {
        let mut config = config_of(None);
        config.extra_args = "--script-args 'a=b' ;".to_string();
        assert_eq!(compile_tokens(&config), vec!["-T4", "--script-args", "'a=b'", ";"]);
    }

    #[test]
    fn request_carries_type_name_and_arguments() {
        let mut config = config_of(Some(ScanType::Vuln));
        config.host = "  10.0.0.5 ".to_string();
        let request = build_request(&config);
        assert_eq!(request.host, "10.0.0.5");
        assert_eq!(request.scan_type.as_deref(), Some("vuln"));
        assert_eq!(request.arguments.as_deref(), Some("-sS -T4"));
    }

    #[test]
    fn udp_preset_only_replaces_the_default_port() {
        let mut config = ScanConfig::default();
        apply_preset(&mut config, ScanType::Udp);
        assert_eq!(config.ports, UDP_PORTS);
        assert_eq!(config.scripts, "discovery");

        let mut custom_ports = ScanConfig { ports: "53".to_string(), ..ScanConfig::default() };
        apply_preset(&mut custom_ports, ScanType::Udp);
        assert_eq!(custom_ports.ports, "53");
    }

    #[test]
    fn intensive_preset_ticks_detection_boxes() {
        let mut config = ScanConfig::default();
        assert!(!apply_preset(&mut config, ScanType::Intensive));
        assert!(config.os_detection && config.version_detection);
        assert_eq!(config.scripts, "default");
    }

    #[test]
    fn custom_preset_requests_advanced_section() {
        let mut config = ScanConfig::default();
        let before = config.scripts.clone();
        assert!(apply_preset(&mut config, ScanType::Custom));
        assert_eq!(config.scripts, before);
    }

    #[test]
    fn fast_preset_rewrites_port_field() {
        let mut config = ScanConfig::default();
        apply_preset(&mut config, ScanType::Fast);
        assert_eq!(config.ports, "--top-ports 1000");
    }
}

//! Environment variable validation and configuration module for leadgate
//!
//! This module provides centralized validation and configuration management
//! for all environment variables used by the submission-defense gateway.
//!
//! # Supported Environment Variables
//!
//! ## Server Configuration
//! - `LEADGATE_HOST`: Server bind address (default: "0.0.0.0")
//! - `LEADGATE_PORT`: Server port (default: "3000")
//!
//! ## Logging Configuration
//! - `RUST_LOG`: Standard Rust logging configuration
//! - `LEADGATE_LOG_LEVEL`: Application-specific log level override
//!
//! ## Email Configuration
//! - `RESEND_API_KEY`: Email provider API key (secret)
//! - `LEADGATE_VERIFIED_DOMAIN`: Verified sending domain; presence switches
//!   the handlers into production posture, absence is the default sandbox
//!   posture
//! - `LEADGATE_OWNER_EMAIL`: Site-owner mailbox for notifications and
//!   sandbox redirects
//! - `LEADGATE_ASSETS_DIR`: Directory holding the lead-magnet PDFs
//!   (default: "assets")
//!
//! ## Rate Limit Configuration
//! - `LEADGATE_IP_RATE_LIMIT`: Requests per IP per window (default: "3")
//! - `LEADGATE_IP_RATE_WINDOW_MS`: IP window in milliseconds (default: "60000")
//! - `LEADGATE_EMAIL_RATE_LIMIT`: Requests per email per window (default: "2")
//! - `LEADGATE_EMAIL_RATE_WINDOW_MS`: Email window in milliseconds
//!   (default: "300000")

use crate::rate_limiter::RateLimitConfig;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

/// Fallback owner mailbox when `LEADGATE_OWNER_EMAIL` is not set.
const DEFAULT_OWNER_EMAIL: &str = "author@catluker-books.com";

/// Environment validation errors
#[derive(Debug, Clone)]
pub struct EnvValidationError {
    pub variable: String,
    pub message: String,
    pub severity: ErrorSeverity,
}

/// Severity level for environment validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    /// Critical errors that prevent application startup
    Critical,
    /// Warnings about missing optional variables or suboptimal configurations
    Warning,
    /// Informational messages about default values being used
    Info,
}

impl ErrorSeverity {
    fn label(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "CRITICAL",
            ErrorSeverity::Warning => "WARNING",
            ErrorSeverity::Info => "INFO",
        }
    }
}

/// Validated application configuration derived from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Server
    pub host: String,
    pub port: u16,
    pub bind_address: SocketAddr,

    // Logging
    pub log_level: String,

    // Email
    pub resend_api_key: Option<String>,
    pub verified_domain: Option<String>,
    pub owner_email: String,
    pub assets_dir: PathBuf,

    // Rate limiting
    pub ip_rate_limit: RateLimitConfig,
    pub email_rate_limit: RateLimitConfig,
}

/// Validate all environment variables and return configuration or errors
pub fn validate_environment() -> Result<AppConfig, Vec<EnvValidationError>> {
    let mut report = Vec::new();

    // Server configuration
    let host = string_or_default("LEADGATE_HOST", "0.0.0.0", &mut report);
    if IpAddr::from_str(&host).is_err() {
        report.push(EnvValidationError {
            variable: "LEADGATE_HOST".to_string(),
            message: format!("Invalid IP address: {}", host),
            severity: ErrorSeverity::Critical,
        });
    }

    let port: u16 = match env::var("LEADGATE_PORT").ok() {
        Some(raw) => match raw.parse() {
            Ok(port) => port,
            Err(_) => {
                report.push(EnvValidationError {
                    variable: "LEADGATE_PORT".to_string(),
                    message: format!("Invalid port number: {}", raw),
                    severity: ErrorSeverity::Critical,
                });
                3000
            }
        },
        None => {
            report.push(EnvValidationError {
                variable: "LEADGATE_PORT".to_string(),
                message: "Using default port 3000".to_string(),
                severity: ErrorSeverity::Info,
            });
            3000
        }
    };
    if (1..1024).contains(&port) {
        report.push(EnvValidationError {
            variable: "LEADGATE_PORT".to_string(),
            message: format!("Using privileged port {}, may require root privileges", port),
            severity: ErrorSeverity::Warning,
        });
    }

    let bind_address: SocketAddr = format!("{}:{}", host, port).parse().unwrap_or_else(|_| {
        report.push(EnvValidationError {
            variable: "LEADGATE_HOST/LEADGATE_PORT".to_string(),
            message: format!("Cannot create valid socket address from {}:{}", host, port),
            severity: ErrorSeverity::Critical,
        });
        ([0, 0, 0, 0], 3000).into()
    });

    // Logging configuration
    let log_level = env::var("LEADGATE_LOG_LEVEL")
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| {
            report.push(EnvValidationError {
                variable: "RUST_LOG/LEADGATE_LOG_LEVEL".to_string(),
                message: "Using default log level 'leadgate=info,tower_http=debug'".to_string(),
                severity: ErrorSeverity::Info,
            });
            "leadgate=info,tower_http=debug".to_string()
        });

    // Email configuration
    let resend_api_key = env::var("RESEND_API_KEY").ok();
    if resend_api_key.is_none() {
        report.push(EnvValidationError {
            variable: "RESEND_API_KEY".to_string(),
            message: "No email provider API key configured; dispatch will fail at the provider"
                .to_string(),
            severity: ErrorSeverity::Warning,
        });
    }

    let verified_domain = env::var("LEADGATE_VERIFIED_DOMAIN").ok();
    if verified_domain.is_none() {
        report.push(EnvValidationError {
            variable: "LEADGATE_VERIFIED_DOMAIN".to_string(),
            message: "No verified sending domain; running in sandbox posture".to_string(),
            severity: ErrorSeverity::Info,
        });
    }

    let owner_email = string_or_default("LEADGATE_OWNER_EMAIL", DEFAULT_OWNER_EMAIL, &mut report);
    let assets_dir = PathBuf::from(string_or_default("LEADGATE_ASSETS_DIR", "assets", &mut report));

    // Rate limit configuration. The email dimension is tuned tighter than
    // the IP dimension: fewer requests, longer window.
    let ip_rate_limit = RateLimitConfig {
        max_requests: parse_or_default("LEADGATE_IP_RATE_LIMIT", 3, &mut report),
        window_ms: parse_or_default("LEADGATE_IP_RATE_WINDOW_MS", 60_000, &mut report),
    };
    let email_rate_limit = RateLimitConfig {
        max_requests: parse_or_default("LEADGATE_EMAIL_RATE_LIMIT", 2, &mut report),
        window_ms: parse_or_default("LEADGATE_EMAIL_RATE_WINDOW_MS", 300_000, &mut report),
    };

    if report.iter().any(|e| e.severity == ErrorSeverity::Critical) {
        return Err(report);
    }

    // Log non-critical findings
    for entry in &report {
        match entry.severity {
            ErrorSeverity::Warning => warn!("{}: {}", entry.variable, entry.message),
            _ => info!("{}: {}", entry.variable, entry.message),
        }
    }

    Ok(AppConfig {
        host,
        port,
        bind_address,
        log_level,
        resend_api_key,
        verified_domain,
        owner_email,
        assets_dir,
        ip_rate_limit,
        email_rate_limit,
    })
}

/// Get the validated configuration, exiting the process if validation fails
pub fn get_config() -> AppConfig {
    match validate_environment() {
        Ok(config) => config,
        Err(report) => {
            eprintln!("Environment validation failed:");
            for entry in report {
                eprintln!(
                    "{} - {}: {}",
                    entry.severity.label(),
                    entry.variable,
                    entry.message
                );
            }
            std::process::exit(1);
        }
    }
}

/// Print environment validation results in a user-friendly format
pub fn print_validation_results(result: &Result<AppConfig, Vec<EnvValidationError>>) {
    match result {
        Ok(config) => {
            println!("Environment validation successful");
            println!("Configuration:");
            println!("  Server: {}", config.bind_address);
            println!("  Log Level: {}", config.log_level);
            println!(
                "  Email API Key: {}",
                if config.resend_api_key.is_some() {
                    "configured"
                } else {
                    "missing"
                }
            );
            match &config.verified_domain {
                Some(domain) => println!("  Posture: production (domain: {})", domain),
                None => println!("  Posture: sandbox (no verified domain)"),
            }
            println!("  Owner Mailbox: {}", config.owner_email);
            println!("  Assets Dir: {}", config.assets_dir.display());
            println!(
                "  IP Rate Limit: {} requests / {}ms",
                config.ip_rate_limit.max_requests, config.ip_rate_limit.window_ms
            );
            println!(
                "  Email Rate Limit: {} requests / {}ms",
                config.email_rate_limit.max_requests, config.email_rate_limit.window_ms
            );
        }
        Err(report) => {
            let critical = report
                .iter()
                .filter(|e| e.severity == ErrorSeverity::Critical)
                .count();
            if critical > 0 {
                eprintln!("Environment validation failed ({} critical):", critical);
            } else {
                println!("Environment validation completed with findings:");
            }
            for entry in report {
                println!(
                    "  {} - {}: {}",
                    entry.severity.label(),
                    entry.variable,
                    entry.message
                );
            }
        }
    }
}

/// Read a string variable, recording an Info entry when the default is used.
fn string_or_default(
    variable: &str,
    default: &str,
    report: &mut Vec<EnvValidationError>,
) -> String {
    env::var(variable).unwrap_or_else(|_| {
        report.push(EnvValidationError {
            variable: variable.to_string(),
            message: format!("Using default '{}'", default),
            severity: ErrorSeverity::Info,
        });
        default.to_string()
    })
}

/// Read and parse a numeric variable, falling back to a default with an Info
/// entry when absent and a Warning when unparseable.
fn parse_or_default<T: FromStr + std::fmt::Display + Copy>(
    variable: &str,
    default: T,
    report: &mut Vec<EnvValidationError>,
) -> T {
    match env::var(variable).ok() {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            report.push(EnvValidationError {
                variable: variable.to_string(),
                message: format!("Invalid value '{}', using default {}", raw, default),
                severity: ErrorSeverity::Warning,
            });
            default
        }),
        None => {
            report.push(EnvValidationError {
                variable: variable.to_string(),
                message: format!("Using default {}", default),
                severity: ErrorSeverity::Info,
            });
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_default_uses_default_when_absent() {
        let mut report = Vec::new();
        let value: u32 = parse_or_default("LEADGATE_TEST_ABSENT_VAR", 3, &mut report);
        assert_eq!(value, 3);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].severity, ErrorSeverity::Info);
    }

    #[test]
    fn string_or_default_records_the_fallback() {
        let mut report = Vec::new();
        let value = string_or_default("LEADGATE_TEST_ABSENT_STRING", "assets", &mut report);
        assert_eq!(value, "assets");
        assert_eq!(report[0].severity, ErrorSeverity::Info);
    }

    #[test]
    fn severity_labels_are_stable() {
        assert_eq!(ErrorSeverity::Critical.label(), "CRITICAL");
        assert_eq!(ErrorSeverity::Warning.label(), "WARNING");
        assert_eq!(ErrorSeverity::Info.label(), "INFO");
    }

    #[test]
    fn default_environment_validates() {
        // With no LEADGATE_* variables set the defaults must produce a
        // sandbox-posture config with the documented limiter tuning.
        let config = validate_environment().expect("default environment should validate");
        assert_eq!(config.ip_rate_limit.max_requests, 3);
        assert_eq!(config.ip_rate_limit.window_ms, 60_000);
        assert_eq!(config.email_rate_limit.max_requests, 2);
        assert_eq!(config.email_rate_limit.window_ms, 300_000);
        assert!(config.email_rate_limit.window_ms > config.ip_rate_limit.window_ms);
    }
}

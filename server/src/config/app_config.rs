//! Runtime application configuration loaded from the environment.

use std::time::Duration;

use anyhow::{Context, bail};
use image_engine::{CenteringPolicy, PipelineOptions};

use super::defaults::DEFAULT_SETTINGS;
use super::validation::validate_setting;

/// Runtime configuration, read-only after startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub server_port: u16,
    pub max_upload_bytes: usize,
    pub max_size: u32,
    pub watermark_scale: f64,
    pub centering: CenteringPolicy,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let options = PipelineOptions::default();
        Self {
            server_port: 8083,
            max_upload_bytes: 10 << 20,
            max_size: 4096,
            watermark_scale: options.watermark_scale,
            centering: options.centering,
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn load() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// unset keys. Every value present is validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let g = |key: &str| -> Result<String, anyhow::Error> {
            let def = DEFAULT_SETTINGS
                .get(key)
                .with_context(|| format!("unknown setting {key}"))?;
            let value = match lookup(key) {
                Some(v) if !v.trim().is_empty() => v.trim().to_string(),
                _ => def.default.to_string(),
            };
            if let Err(msg) = validate_setting(key, &value) {
                bail!("invalid {key}={value:?}: {msg} ({})", def.description);
            }
            Ok(value)
        };

        Ok(Self {
            server_port: g("QR_SERVER_PORT")?.parse()?,
            max_upload_bytes: g("QR_MAX_UPLOAD_BYTES")?.parse()?,
            max_size: g("QR_MAX_SIZE")?.parse()?,
            watermark_scale: g("QR_WATERMARK_SCALE")?.parse()?,
            centering: parse_centering(&g("QR_CENTERING")?),
            request_timeout_secs: g("QR_REQUEST_TIMEOUT_SECS")?.parse()?,
        })
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            watermark_scale: self.watermark_scale,
            centering: self.centering,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_centering(s: &str) -> CenteringPolicy {
    match s {
        "square" => CenteringPolicy::SquareBackground,
        _ => CenteringPolicy::Centered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_with(pairs: &[(&str, &str)]) -> Result<AppConfig, anyhow::Error> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        assert_eq!(load_with(&[]).unwrap(), AppConfig::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = load_with(&[
            ("QR_SERVER_PORT", "9000"),
            ("QR_WATERMARK_SCALE", "0.5"),
            ("QR_CENTERING", "square"),
            ("QR_REQUEST_TIMEOUT_SECS", " 5 "),
        ])
        .unwrap();
        assert_eq!(config.server_port, 9000);
        assert_eq!(config.watermark_scale, 0.5);
        assert_eq!(config.centering, CenteringPolicy::SquareBackground);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn blank_value_falls_back_to_default() {
        let config = load_with(&[("QR_MAX_SIZE", "  ")]).unwrap();
        assert_eq!(config.max_size, 4096);
    }

    #[test]
    fn invalid_value_is_rejected() {
        let err = load_with(&[("QR_CENTERING", "diagonal")]).unwrap_err();
        assert!(err.to_string().contains("QR_CENTERING"), "{err}");
    }

    #[test]
    fn invalid_value_error_describes_setting() {
        let err = load_with(&[("QR_SERVER_PORT", "0")]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("must be between 1 and 65535"), "{message}");
        assert!(message.contains("TCP port the HTTP server listens on"), "{message}");
    }

    #[test]
    fn pipeline_options_follow_config() {
        let config = load_with(&[("QR_WATERMARK_SCALE", "0.3")]).unwrap();
        let options = config.pipeline_options();
        assert_eq!(options.watermark_scale, 0.3);
        assert_eq!(options.centering, CenteringPolicy::Centered);
    }
}

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engine::SessionConfig;
use thiserror::Error;
use tracing::{info, warn};

pub(crate) const SESSION_CONFIG_ENV_VAR: &str = "EVERGREEN_SESSION_CONFIG";
const MAX_TARGET_TPS: u32 = 1_000;
const MAX_BLEND_SECONDS: f32 = 600.0;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read session config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse session config {path} at {location}: {source}")]
    Parse {
        path: PathBuf,
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid session config {path}: {field} {message}")]
    Invalid {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}

pub(crate) fn load_session_config_from_env() -> Result<SessionConfig, ConfigError> {
    match std::env::var_os(SESSION_CONFIG_ENV_VAR) {
        Some(raw) => load_session_config(Path::new(&raw)),
        None => {
            info!("session_config_defaults");
            Ok(SessionConfig::default())
        }
    }
}

pub(crate) fn load_session_config(path: &Path) -> Result<SessionConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "session_config_missing_using_defaults");
            return Ok(SessionConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = parse_session_config(&raw).map_err(|(location, source)| ConfigError::Parse {
        path: path.to_path_buf(),
        location,
        source,
    })?;
    validate_session_config(&config).map_err(|(field, message)| ConfigError::Invalid {
        path: path.to_path_buf(),
        field,
        message,
    })?;
    info!(path = %path.display(), "session_config_loaded");
    Ok(config)
}

fn parse_session_config(raw: &str) -> Result<SessionConfig, (String, serde_json::Error)> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        let location = if path.is_empty() || path == "." {
            "document root".to_string()
        } else {
            path
        };
        (location, error.into_inner())
    })
}

fn validate_session_config(config: &SessionConfig) -> Result<(), (&'static str, String)> {
    if config.target_tps == 0 || config.target_tps > MAX_TARGET_TPS {
        return Err((
            "target_tps",
            format!("must be within 1..={MAX_TARGET_TPS}, got {}", config.target_tps),
        ));
    }
    for (field, seconds) in [
        (
            "observe_blend.blend_time_seconds",
            config.observe_blend.blend_time_seconds,
        ),
        (
            "return_blend.blend_time_seconds",
            config.return_blend.blend_time_seconds,
        ),
    ] {
        if !(0.0..=MAX_BLEND_SECONDS).contains(&seconds) {
            return Err((
                field,
                format!("must be within 0..={MAX_BLEND_SECONDS} seconds, got {seconds}"),
            ));
        }
    }
    let offset = &config.camera_offset;
    for (field, value) in [
        ("camera_offset.scale_x", offset.scale_x),
        ("camera_offset.scale_y", offset.scale_y),
        ("camera_offset.interp_speed", offset.interp_speed),
    ] {
        if !value.is_finite() {
            return Err((field, format!("must be finite, got {value}")));
        }
    }
    Ok(())
}

use std::time::Duration;

use engine::{Session, SessionConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{self, ConfigError};
use super::demo::{self, DemoScript};

const WINDOW_SIZE: (u32, u32) = (1280, 720);
const MAX_DEMO_DURATION: Duration = Duration::from_secs(60);

pub(crate) struct AppWiring {
    pub(crate) session: Session,
    pub(crate) script: DemoScript,
    pub(crate) window_size: (u32, u32),
    pub(crate) max_duration: Duration,
}

pub(crate) fn build_app() -> Result<AppWiring, ConfigError> {
    init_tracing();
    info!("=== Evergreen Session Demo ===");

    let config = config::load_session_config_from_env()?;
    Ok(wire(config))
}

pub(crate) fn wire(config: SessionConfig) -> AppWiring {
    info!(
        target_tps = config.target_tps,
        test_mode = config.test_mode,
        "session_config_applied"
    );
    AppWiring {
        session: demo::build_session(config),
        script: DemoScript::standard(),
        window_size: WINDOW_SIZE,
        max_duration: MAX_DEMO_DURATION,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

use std::str::FromStr;

use tracing::Level;

use crate::error::{Result, SimError};
use crate::settings::TelemetrySettings;

/// Installs the global `tracing` subscriber described by `settings`.
///
/// Fails if the level does not parse or a subscriber is already installed.
pub fn init(settings: &TelemetrySettings) -> Result<()> {
    let level = Level::from_str(&settings.level).map_err(|_| {
        SimError::InvalidSetting(format!("unknown log level {:?}", settings.level))
    })?;

    let builder = tracing_subscriber::fmt().with_max_level(level);
    let installed = if settings.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.map_err(|e| SimError::Telemetry(e.to_string()))
}

use chorus_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("core: {0}")]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings parse error: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("settings encode error: {0}")]
    SettingsEncode(#[from] toml::ser::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// Leapfrog integration diverges when `period >= 2 / omega`.
    #[error("oscillator is unstable: period {period} >= 2 / omega ({limit})")]
    Unstable { period: f64, limit: f64 },

    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    #[error("telemetry init failed: {0}")]
    Telemetry(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

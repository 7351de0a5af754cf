use crate::application::poller::DEFAULT_POLL_INTERVAL;
use crate::domain::series::SeriesDefinition;
use crate::domain::time_window::TimeWindow;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub dashboard: ViewSettings,
    pub influx: InfluxSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub listen_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub resource: String,
    pub request_timeout_ms: u64,
}

/// Store behind the chart endpoint this service serves itself
#[derive(Debug, Deserialize, Clone)]
pub struct InfluxSettings {
    pub host: String,
    #[serde(default)]
    pub token: String,
    pub database: String,
    pub retention_policy: String,
    pub default_since: String,
    pub default_group_by: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewSettings {
    pub container: String,
    pub poll_interval_ms: u64,
    /// Page URL whose `since` query parameter seeds the time window
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(default)]
    pub series: Vec<SeriesDefinition>,
}

impl BackendSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl ViewSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn time_window(&self) -> TimeWindow {
        self.page_url
            .as_deref()
            .map(TimeWindow::from_url)
            .unwrap_or_default()
    }

    /// Configured series, or the built-in channel table when none are set
    pub fn series_definitions(&self) -> Vec<SeriesDefinition> {
        if self.series.is_empty() {
            SeriesDefinition::defaults()
        } else {
            self.series.clone()
        }
    }
}

/// Load `config/dashboard.*` (optional) over built-in defaults, then
/// `DASHBOARD__SECTION__KEY` environment overrides.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

impl DashboardConfig {
    /// Reject values that would break the fixed polling cadence.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.dashboard.poll_interval_ms == 0 {
            anyhow::bail!("dashboard.poll_interval_ms must be greater than 0");
        }
        if self.backend.request_timeout_ms == 0 {
            anyhow::bail!("backend.request_timeout_ms must be greater than 0");
        }
        Ok(())
    }
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(builder
        .set_default("server.listen_addr", "0.0.0.0:8080")?
        .set_default("backend.base_url", "http://localhost:8080")?
        .set_default("backend.resource", "space-shuttle")?
        .set_default("backend.request_timeout_ms", 10_000)?
        .set_default("dashboard.container", "chartdiv")?
        .set_default(
            "dashboard.poll_interval_ms",
            DEFAULT_POLL_INTERVAL.as_millis() as u64,
        )?
        .set_default("influx.host", "http://localhost:8086")?
        .set_default("influx.database", "space_shuttle")?
        .set_default("influx.retention_policy", "autogen")?
        .set_default("influx.default_since", "1d")?
        .set_default("influx.default_group_by", "1h")?)
}

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub gemini: GeminiSettings,
    pub auth: AuthSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub store_path: String,
    pub simulated_delay_ms: u64,
}

impl AuthSettings {
    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub notice_ttl_ms: u64,
}

impl DashboardSettings {
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }
}

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

fn with_defaults() -> anyhow::Result<Builder> {
    Ok(config::Config::builder()
        .set_default("server.bind_addr", "0.0.0.0:8080")?
        .set_default("server.max_upload_bytes", 10 * 1024 * 1024)?
        .set_default("gemini.model", "gemini-flash-latest")?
        .set_default("gemini.base_url", "https://generativelanguage.googleapis.com")?
        .set_default("auth.store_path", "data/credentials.json")?
        .set_default("auth.simulated_delay_ms", 1000)?
        .set_default("dashboard.notice_ttl_ms", 3000)?)
}

/// Defaults, then `config/app.*` if present, then `INSIGHTS__*` variables.
/// The API key may also come from a plain `API_KEY` variable.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let builder = with_defaults()?
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(config::Environment::with_prefix("INSIGHTS").separator("__"));

    let mut settings = parse_app_config(builder)?;
    if settings.gemini.api_key.is_none() {
        settings.gemini.api_key = std::env::var("API_KEY").ok();
    }
    Ok(settings)
}

fn parse_app_config(builder: Builder) -> anyhow::Result<AppConfig> {
    let settings = builder.build()?;
    Ok(settings.try_deserialize()?)
}

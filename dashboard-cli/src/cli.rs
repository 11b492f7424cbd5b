use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use dashboard_core::{Config, Dashboard, HttpWeatherSource, MemoryView, SnapshotOutcome};
use inquire::{InquireError, Password, Text};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::terminal;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Weather dashboard")]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Dashboard backend URL; overrides the configured one.
    #[arg(long, global = true, env = "WEATHER_DASHBOARD_URL")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the weather for a city (the configured default city if omitted).
    Show {
        city: Option<String>,
    },

    /// Show the latest snapshot published by the backend, if any.
    Snapshot,

    /// Show the default city, then prompt for cities to search.
    Interactive,

    /// Configure the backend URL, default city and OpenWeather API key.
    Configure,

    /// Run the backend server.
    Serve {
        /// Listen address; overrides the configured one.
        #[arg(long)]
        bind: Option<String>,

        /// OpenWeather API key; overrides the configured one.
        #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
}

/// Log filter for a `-v` count.
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

impl Cli {
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(log_filter_from_verbosity(self.verbose)));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let mut config = Config::load()?;
        if let Some(server) = self.server {
            config.server_url = Some(server);
        }

        match self.command {
            Command::Show { city } => {
                let (dashboard, view) = dashboard(&config)?;
                let shown = show(&dashboard, city).await;
                terminal::draw(&view);
                if !shown {
                    return Ok(ExitCode::FAILURE);
                }
            }
            Command::Snapshot => {
                let (dashboard, view) = dashboard(&config)?;
                match dashboard.load_cached_reading().await {
                    SnapshotOutcome::Rendered => terminal::draw(&view),
                    SnapshotOutcome::NoData => println!("No data received yet."),
                    SnapshotOutcome::Failed => {
                        println!("Snapshot unavailable (run with -v for details).")
                    }
                }
            }
            Command::Interactive => interactive(&config).await?,
            Command::Configure => configure(config)?,
            Command::Serve { bind, api_key } => {
                if let Some(key) = api_key {
                    config.set_upstream_api_key(key);
                }
                let addr = bind.unwrap_or_else(|| config.bind().to_string());
                dashboard_server::serve(&config, &addr).await?;
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}

/// Look up `city` (or the default city) into the dashboard's view.
///
/// A failure has already raised the view's alert, so it is only logged here.
async fn show(dashboard: &Dashboard, city: Option<String>) -> bool {
    let result = match city {
        Some(city) => dashboard.load_reading_for_city(&city).await,
        None => dashboard.on_page_load().await,
    };

    match result {
        Ok(()) => true,
        Err(err) => {
            debug!(error = %err, "Lookup failed");
            false
        }
    }
}

fn dashboard(config: &Config) -> anyhow::Result<(Dashboard, Arc<MemoryView>)> {
    let source = HttpWeatherSource::from_config(config)?;
    debug!(server = %source.base_url(), "Using dashboard backend");

    let view = Arc::new(MemoryView::new());
    let dashboard = Dashboard::new(Arc::new(source), view.clone())
        .with_default_city(config.default_city());

    Ok((dashboard, view))
}

async fn interactive(config: &Config) -> anyhow::Result<()> {
    let (dashboard, view) = dashboard(config)?;

    // A failed lookup has already been shown as an alert.
    let _ = dashboard.on_page_load().await;
    terminal::draw(&view);

    loop {
        let input = Text::new("City:")
            .with_help_message(&format!(
                "Blank searches {}; Esc or Ctrl+C quits",
                dashboard.default_city()
            ))
            .prompt();

        match input {
            Ok(city) => {
                view.set_input(city);
                let _ = dashboard.on_search().await;
                terminal::draw(&view);
            }
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city"),
        }
    }

    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let server_url = Text::new("Dashboard backend URL:")
        .with_default(config.server_url())
        .prompt()
        .context("Failed to read backend URL")?;

    let default_city = Text::new("Default city:")
        .with_default(config.default_city())
        .prompt()
        .context("Failed to read default city")?;

    let api_key = Password::new("OpenWeather API key (leave blank to keep current):")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.server_url = Some(server_url.trim().to_string());
    config.default_city = Some(default_city.trim().to_string());
    if !api_key.trim().is_empty() {
        config.set_upstream_api_key(api_key.trim().to_string());
    }

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use dashboard_core::{DashboardView, FETCH_FAILED_MESSAGE, Field};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use super::*;

    #[test]
    fn verbosity_maps_to_filter() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
        assert_eq!(log_filter_from_verbosity(1), "info");
        assert_eq!(log_filter_from_verbosity(2), "debug");
        assert_eq!(log_filter_from_verbosity(9), "trace");
    }

    #[test]
    fn parses_show_with_city() {
        let cli = Cli::try_parse_from(["weather-dashboard", "-vv", "show", "algiers"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Show { city: Some(ref c) } if c == "algiers"));
    }

    #[test]
    fn parses_serve_flags() {
        let cli = Cli::try_parse_from([
            "weather-dashboard",
            "serve",
            "--bind",
            "127.0.0.1:9000",
            "--api-key",
            "KEY",
        ])
        .unwrap();

        match cli.command {
            Command::Serve { bind, api_key } => {
                assert_eq!(bind.as_deref(), Some("127.0.0.1:9000"));
                assert_eq!(api_key.as_deref(), Some("KEY"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn dashboard_uses_configured_default_city() {
        let config = Config {
            default_city: Some("oran".into()),
            ..Default::default()
        };
        let (dashboard, view) = dashboard(&config).unwrap();
        assert_eq!(dashboard.default_city(), "oran");
        assert!(view.input_value().is_empty());
    }

    fn config_for(server: &MockServer) -> Config {
        Config {
            server_url: Some(server.uri()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn failed_show_raises_only_the_fixed_alert() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .respond_with(ResponseTemplate::new(500).set_body_string("city not found"))
            .mount(&server)
            .await;

        let (dashboard, view) = dashboard(&config_for(&server)).unwrap();
        let shown = show(&dashboard, Some("atlantis".into())).await;

        assert!(!shown);
        assert_eq!(view.alerts(), vec![FETCH_FAILED_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn show_without_city_uses_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/weather"))
            .and(query_param("city", "jijel"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "city": { "name": "Jijel" },
                "list": [{
                    "main": { "temp": 21.25, "humidity": 60 },
                    "weather": [{ "description": "clear sky" }]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (dashboard, view) = dashboard(&config_for(&server)).unwrap();
        assert!(show(&dashboard, None).await);
        assert_eq!(view.text(Field::Temperature).as_deref(), Some("21.3°C"));
        assert!(view.alerts().is_empty());
    }
}

// Entrypoint for the CLI application.
// - Sets up logging to stderr (`RUST_LOG`, default `warn`) so it never
//   mixes with the status lines printed on stdout.
// - Loads settings, builds the API client and runs one prompt session.

use afdb_cli::{api::ApiClient, config::Settings, ui::run_prompt};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from_env();
    tracing::debug!(?settings, "loaded settings");
    let api = ApiClient::from_settings(&settings)?;

    run_prompt(&api, &settings)?;
    Ok(())
}

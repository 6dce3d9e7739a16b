/// Encore - favorites and catalog from the terminal
use clap::Parser;
use encore_cli::{
    app::App,
    commands::{self, Cli},
    config::EncoreConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = EncoreConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let app = App::connect(config).await?;

    if let Err(err) = commands::run(&app, cli.command).await {
        // 401-class failures end the stored session
        return Err(match err.into_encore() {
            Ok(domain) => {
                if app.auth.handle_auth_failure(&domain) {
                    app.account.clear_credentials().await;
                    eprintln!("Session rejected by the server; signed out");
                }
                domain.into()
            }
            Err(other) => other.into(),
        });
    }

    Ok(())
}

use clap::Parser;
use dotenv::dotenv;
use relay_artifacts::{AppState, Args, web};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let port = args.port;
    let app_state = AppState::from_args(args).await?;

    let app = web::router(app_state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    info!("Server running on http://0.0.0.0:{port}");
    axum::serve(listener, app).await?;

    Ok(())
}

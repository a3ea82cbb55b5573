use reelhub_api::{build_router, state::AppState};
use reelhub_config::Settings;
use reelhub_db::{connect, indexes::ensure_indexes};
use reelhub_services::mail;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "reelhub_api=debug,reelhub_services=debug,reelhub_db=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load()?;
    info!("Starting reelhub API on {}:{}", settings.app.host, settings.app.port);
    info!(
        public_url = %settings.app.public_url,
        smtp = settings.mail.host.as_deref().unwrap_or("<log only>"),
        "Outbound config"
    );

    let db = connect(&settings.database).await?;
    ensure_indexes(&db).await?;

    let mailer = mail::from_settings(&settings.mail)?;
    let app_state = AppState::new(db, settings.clone(), mailer);

    let app = build_router(app_state);

    let addr = format!("{}:{}", settings.app.host, settings.app.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

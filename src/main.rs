use std::sync::Arc;

use quiz_backend::{
    config::{get_config, init_config},
    routes::create_router,
    store::sheets::SheetsStore,
    AppState,
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quiz_backend=info,tower_http=info")),
        )
        .init();
    init_config()?;
    let config = get_config();

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let store = Arc::new(SheetsStore::new(
        client,
        config.sheets_base_url.clone(),
        config.spreadsheet_id.clone(),
        config.sheets_access_token.clone(),
    ));

    let state = AppState::new(store);

    match (&config.admin_username, &config.admin_password) {
        (Some(username), Some(password)) => {
            state.auth_service.seed_admin(username, password).await?;
        }
        (None, None) => {}
        _ => warn!("ADMIN_USERNAME and ADMIN_PASSWORD must both be set; admin not seeded"),
    }

    let app = create_router(state);

    let listener = TcpListener::bind(&config.server_address).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

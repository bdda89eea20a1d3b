mod app;
mod config;
mod error;
mod state;
mod users;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    app::init_tracing();

    let app_state = state::AppState::init().await?;
    let bind = app_state.config.bind_addr();
    tracing::info!(store = ?app_state.config.store, "user store ready");

    app::serve(app::build_app(app_state), &bind).await
}

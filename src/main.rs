//src/main.rs

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use condohub::{
    config::{AppState, Settings},
    routes::build_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG tem prioridade sobre o filtro padrão
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("condohub=info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let settings = Settings::from_env()?;
    let app_state = AppState::new(settings)
        .await
        .context("Falha ao inicializar o estado da aplicação.")?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados.")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let addr = app_state.settings.bind_addr.clone();
    let app = build_router(app_state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {}", addr))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}

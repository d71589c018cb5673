use fundmatch::create_app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present, then initialize tracing
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let bind_addr =
        std::env::var("FUNDMATCH_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

    // Run our server
    let app = create_app();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server running on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

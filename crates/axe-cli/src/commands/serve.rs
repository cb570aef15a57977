//! Server command implementation

use std::path::Path;

use anyhow::Result;

pub async fn cmd_serve(host: &str, port: u16, static_dir: Option<&Path>) -> Result<()> {
    println!("🚀 Starting Axe analysis service...");
    println!("   Listening: http://{}:{}", host, port);
    println!("   Endpoint:  POST /api/analyze");
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let config = axe_server::ServerConfig::from_env();
    if config.allowed_origins.is_empty() {
        println!("   🌐 CORS: any origin (set AXE_ALLOWED_ORIGINS to restrict)");
    } else {
        println!("   🌐 CORS: {}", config.allowed_origins.join(", "));
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let static_dir = static_dir.map(|p| p.to_string_lossy().to_string());
    axe_server::serve_with_config(host, port, static_dir.as_deref(), config).await
}

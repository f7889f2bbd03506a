use std::sync::Arc;

use clap::Parser;

use admin_api::admin::{self, AdminService, AdminState, types::PaginationSettings};
use admin_api::auth::TokenIssuer;
use admin_api::model::arg::Args;
use admin_api::model::config::Config;
use admin_api::response::ResponseSettings;
use admin_api::store::SqliteAdminRepository;

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config_path = args
        .config
        .unwrap_or_else(|| Config::default_config_path().to_string());
    let config = Config::load(&config_path).unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {:#}", e);
        std::process::exit(1);
    });

    // Signing secret is mandatory; an empty string counts as missing
    let jwt_secret = config.jwt_secret().unwrap_or_else(|| {
        tracing::error!("jwtSecret not set in config file");
        std::process::exit(1);
    });
    let token_issuer = TokenIssuer::new(jwt_secret, config.jwt_issuer.clone(), config.jwt_ttl_secs);

    // Open the credential store
    let repository = SqliteAdminRepository::connect(&config.database_url, config.max_connections)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to open database {}: {}", config.database_url, e);
            std::process::exit(1);
        });
    if let Err(e) = repository.migrate().await {
        tracing::error!("Failed to prepare schema: {}", e);
        std::process::exit(1);
    }
    tracing::info!("Database ready: {}", config.database_url);

    let service = AdminService::new(Arc::new(repository), token_issuer, config.password_digest);

    // Seed the configured admin account
    if let Some(bootstrap) = &config.bootstrap_admin {
        match service.ensure_bootstrap_admin(bootstrap).await {
            Ok(true) => {}
            Ok(false) => tracing::info!("Bootstrap admin {} already exists", bootstrap.account),
            Err(e) => {
                tracing::error!("Failed to seed bootstrap admin: {}", e);
                std::process::exit(1);
            }
        }
    }

    let pagination = PaginationSettings {
        default_per_page: config.default_per_page,
        max_per_page: config.max_per_page,
    };
    let state = AdminState::new(service, ResponseSettings::from_config(&config), pagination);
    let app = admin::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting admin API endpoint: {}", addr);
    tracing::info!(
        "Response mode: restful={}, unified_json={}, debug={}",
        config.response.is_restful,
        config.response.is_unified_return_json,
        config.debug
    );
    tracing::info!("Available APIs:");
    tracing::info!("  POST /admin/login");
    tracing::info!("  GET  /admin/admins");
    tracing::info!("  GET  /admin/me");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap_or_else(|e| {
        tracing::error!("Failed to bind {}: {}", addr, e);
        std::process::exit(1);
    });
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use crypto_core::jwt;
use db_pool::{create_pool, DbConfig};
use meetup_service::db::{self, PgMeetupRepository};
use meetup_service::handlers::{self, HealthState};
use meetup_service::openapi::ApiDoc;
use meetup_service::services::MeetupService;
use meetup_service::Config;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

const DEFAULT_LOG_FILTER: &str = "info,actix_web=info,sqlx=warn";

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn run_healthcheck() -> io::Result<()> {
    let port = std::env::var("MEETUP_SERVICE_PORT").unwrap_or_else(|_| "8085".to_string());
    let url = format!("http://127.0.0.1:{port}/api/v1/health");

    match reqwest::Client::new().get(&url).send().await {
        Ok(resp) if resp.status().is_success() => Ok(()),
        Ok(resp) => {
            eprintln!("healthcheck HTTP status: {}", resp.status());
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"))
        }
        Err(e) => {
            eprintln!("healthcheck HTTP error: {}", e);
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"))
        }
    }
}

async fn openapi_json(doc: web::Data<utoipa::openapi::OpenApi>) -> actix_web::Result<HttpResponse> {
    let body = serde_json::to_string(&*doc).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Meetup Service
///
/// # Routes
///
/// - `/api/v1/meetups` - list (GET) and create (POST) the caller's meetups
/// - `/api/v1/meetups/{id}` - show (GET), update (PUT) and cancel (DELETE)
/// - `/api/v1/health`, `/api/v1/health/ready`, `/api/v1/health/live`
/// - `/api/v1/openapi.json`, `/metrics`
///
/// Runs on port 8085 unless `MEETUP_SERVICE_PORT` says otherwise.
#[actix_web::main]
async fn main() -> io::Result<()> {
    // Container probes run the binary as `meetup-service healthcheck`.
    if let Some(cmd) = std::env::args().nth(1) {
        if cmd == "healthcheck" || cmd == "healthcheck-http" {
            return run_healthcheck().await;
        }
    }

    dotenvy::dotenv().ok();
    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting meetup-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    match jwt::load_validation_key() {
        Ok(public_key) => jwt::initialize_jwt_validation_only(&public_key).map_err(|err| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to initialize JWT keys: {err}"),
            )
        })?,
        Err(err) if config.auth.require_public_key => {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("JWT public key is required in production: {err}"),
            ));
        }
        Err(err) => {
            tracing::warn!(
                "JWT public key not configured ({err}); authentication middleware will reject every request"
            );
        }
    }

    let db_cfg = DbConfig::from_env("meetup-service", &config.database.url);
    db_cfg.log_config();
    let db_pool = match create_pool(db_cfg).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Connected to database via db-pool crate");

    if config.database.run_migrations {
        db::run_migrations(&db_pool).await.map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to run database migrations: {e}"),
            )
        })?;
        tracing::info!("Database migrations applied");
    }

    let repo = Arc::new(PgMeetupRepository::new(db_pool.clone()));
    let meetup_data = web::Data::new(MeetupService::with_page_size(
        repo,
        config.meetups.max_page_size,
    ));
    let health_state = web::Data::new(HealthState::new(db_pool.clone()));
    let openapi_doc = web::Data::new(ApiDoc::openapi());

    let bind_address = config.bind_address();
    let allowed_origins = config.cors.allowed_origins.clone();
    tracing::info!("Starting HTTP server at {}", bind_address);

    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin.is_empty() {
                continue;
            }
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(meetup_data.clone())
            .app_data(health_state.clone())
            .app_data(openapi_doc.clone())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(meetup_service::metrics::serve_metrics),
            )
            .route("/api/v1/health", web::get().to(handlers::health_summary))
            .route(
                "/api/v1/health/ready",
                web::get().to(handlers::readiness_summary),
            )
            .route("/api/v1/health/live", web::get().to(handlers::liveness_check))
            .route(ApiDoc::openapi_json_path(), web::get().to(openapi_json))
            .configure(handlers::configure_routes)
    })
    .bind(&bind_address)?
    .workers(config.app.workers)
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    let joined = tokio::select! {
        joined = &mut server_task => joined,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, stopping HTTP server");
            server_handle.stop(true).await;
            server_task.await
        }
    };

    let result = joined
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
        .and_then(|r| r);

    db_pool.close().await;
    tracing::info!("meetup-service stopped");
    result
}

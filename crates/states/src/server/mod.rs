mod fallback;
mod routes;

use std::time::Instant;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{any, get};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::prelude::{eprintln, *};
use crate::service::StatesService;
use crate::store::FunFactStore;

#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3500")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Origins allowed by CORS (comma separated). Any origin when empty.
    #[arg(long = "allowed-origin", env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,
}

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    let database = global.database_path();
    let store = FunFactStore::open(&database)
        .map_err(|e| eyre!("Failed to open database {}: {}", database.display(), e))?;
    log::info!("{} fun fact documents in store", store.count().await?);
    let service = StatesService::new(store);

    let app = router(service).layer(cors_layer(&options.allowed_origins)?);

    let addr = format!("{}:{}", options.host, options.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    log::info!("listening on http://{addr} (database: {})", database.display());
    if global.verbose {
        eprintln!("States API listening on http://{}", addr);
        eprintln!("Database: {}", database.display());
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    log::info!("server stopped");
    Ok(())
}

/// All routes, without the CORS layer.
pub fn router(service: StatesService) -> Router {
    Router::new()
        .route("/", get(fallback::index))
        .route("/states", get(routes::list_states))
        .route("/states/", get(routes::list_states))
        .route("/states/{state}", get(routes::get_state))
        .route(
            "/states/{state}/funfact",
            get(routes::random_fun_fact)
                .post(routes::create_fun_facts)
                .patch(routes::replace_fun_fact)
                .delete(routes::delete_fun_fact),
        )
        .route("/states/{state}/capital", get(routes::capital))
        .route("/states/{state}/nickname", get(routes::nickname))
        .route("/states/{state}/population", get(routes::population))
        .route("/states/{state}/admission", get(routes::admission))
        .route("/states/{state}/{*rest}", any(routes::unknown_state_route))
        .fallback(fallback::not_found)
        .layer(middleware::from_fn(log_requests))
        .with_state(service)
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| eyre!("Invalid origin '{}': {}", origin, e))
        })
        .collect::<Result<_>>()?;

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} {} {:?}",
        method,
        uri,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

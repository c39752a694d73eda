pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod enroll;
pub mod err;
pub mod hash;
pub mod models;
pub mod seed;

#[cfg(test)]
mod memory;

use axum::{routing::get, routing::post, Router, Json};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use axum::handler::Handler;
use axum::response::Html;
use axum::Extension;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use crate::config::Config;
use crate::db::{MySqlStore, Store};
use crate::err::{Error, Success};
use crate::hash::Hasher;

pub type Payload<T> = Result<Json<Success<T>>, Error>;

/// TCP keep-alive probe interval on accepted sockets. hyper 0.14 has no
/// HTTP idle timeout, so this is the closest knob to a 120 s keep-alive.
pub const TCP_KEEPALIVE: Duration = Duration::from_secs(120);

pub fn proceeds<V>(value: V) -> Payload<V> where V: Serialize {
    Ok(Json(Success::of(value)))
}

/// Everything a handler needs, shared through an `Extension`.
#[derive(Clone)]
pub struct Context {
    pub store: Arc<dyn Store>,
    pub hasher: Hasher,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Ok(path) = dotenv {
        log::debug!("Loaded environment from {}", path.display());
    }

    let config = Config::from_env()?;
    let pool = db::connect(&config).await?;
    let ctx = Context {
        store: Arc::new(MySqlStore::new(pool)),
        hasher: Hasher::default(),
    };
    seed::ensure_admin(ctx.store.as_ref(), &ctx.hasher).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    log::info!("Starting Study Manager HTTP Server on http://{}", addr);
    axum::Server::bind(&addr)
        .tcp_keepalive(Some(TCP_KEEPALIVE))
        .serve(app(ctx).into_make_service())
        .await?;
    Ok(())
}

pub fn app(ctx: Context) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/register", post(auth::register_student))
        .route("/login", post(auth::login_student))
        .route("/carreras", get(catalog::list_careers))
        .route("/anios/:carrera_id", get(catalog::list_years))
        .route("/materias/:carrera_id/:anio", get(catalog::list_subjects))
        .route("/matricular", post(enroll::enroll_student))
        .route("/materias-matriculadas/:usuario_id", get(enroll::list_enrolled_subjects))
        .fallback(err::handler404.into_service())
        .layer(Extension(ctx))
        .layer(cors)
}

async fn index() -> Html<&'static str> {
    Html("<h1>Bienvenido al backend de Study Manager</h1><p>Esta es la API del backend, consulta la documentación para usar los endpoints disponibles.</p>")
}

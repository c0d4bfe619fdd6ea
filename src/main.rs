mod assets;
mod config;
mod extract;
mod form;
mod instances;
mod notify;
mod page;
mod pages;
mod partials;
mod verifier;

use std::future::IntoFuture;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum_extra::extract::cookie::Key;
use futures_concurrency::future::Race;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::verifier::SimulatedVerifier;

pub(crate) type Instances = Arc<instances::Instances>;

/// How often idle form instances are looked for.
const REAP_PERIOD: Duration = Duration::from_secs(60);

#[derive(Clone)]
struct AppState {
    /// Per-session login pages.
    instances: Instances,
    /// Key for signing cookies.
    key: Key,
}

impl FromRef<AppState> for Instances {
    fn from_ref(state: &AppState) -> Self {
        state.instances.clone()
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index::index))
        .route(
            "/f/login",
            get(partials::login_form::current).post(partials::login_form::submit),
        )
        .route(
            "/f/login/field/{field}",
            post(partials::login_form::validate_field),
        )
        .route("/f/signup", post(partials::login_form::sign_up))
        .route("/app.css", get(assets::css))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    tracing::debug!(?config, "loaded configuration");

    let verifier = Arc::new(SimulatedVerifier::new(config.submit_delay));
    let instances = Arc::new(instances::Instances::new(verifier, config.idle_timeout));

    let state = AppState {
        instances: instances.clone(),
        key: Key::generate(),
    };

    let addr = SocketAddr::new(Ipv4Addr::LOCALHOST.into(), config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("serving on {addr:?}");

    let reaper = async {
        instances::reap(instances, REAP_PERIOD).await;
        Ok::<_, std::io::Error>(())
    };
    (reaper, axum::serve(listener, app(state)).into_future())
        .race()
        .await?;

    Ok(())
}

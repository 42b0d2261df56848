//! HTTP surface for the mock server
//!
//! ```text
//! /api/*        → MockServer::handle
//! /__scenario   GET current mapping, PUT replace it
//! /__role       GET {role}, PUT {role}
//! /__reset      POST, all-success and starting role
//! /spec/*       static spec documents (when a directory is configured)
//! ```
//!
//! Rejections are rendered with the same `{message}` body as handler
//! errors.

use crate::error::{RequestError, ServeError};
use crate::scenario::ScenarioState;
use crate::server::MockServer;
use crate::types::{status, Method, MockRequest, MockResponse};
use preview_spec::Role;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use warp::filters::path::FullPath;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// How long in-flight requests may keep the server up after shutdown is
/// requested. `timeout`-mode requests never finish on their own.
pub const SHUTDOWN_DRAIN: Duration = Duration::from_secs(2);

/// Body of `GET /__role` and `PUT /__role`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBody {
    /// Active role
    pub role: Role,
}

impl RoleBody {
    /// Parse a raw `PUT /__role` body
    ///
    /// # Errors
    /// - `RequestError::InvalidJson` if the body is not JSON
    /// - `RequestError::InvalidRole` if `role` is missing or names no known role
    pub fn from_body(body: &[u8]) -> Result<Self, RequestError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| RequestError::InvalidJson)?;
        match value.get("role") {
            Some(Value::String(raw)) => raw
                .parse()
                .map(|role| Self { role })
                .map_err(|_| RequestError::InvalidRole(raw.clone())),
            other => Err(RequestError::InvalidRole(
                other.map_or_else(|| "null".to_string(), Value::to_string),
            )),
        }
    }
}

/// Build the complete filter tree
pub fn routes(
    server: Arc<MockServer>,
    spec_dir: Option<PathBuf>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone + Send + Sync + 'static {
    let with_server = warp::any().map(move || Arc::clone(&server));

    let query = warp::query::raw()
        .or(warp::any().map(String::new))
        .unify();

    let api = warp::path("api")
        .and(warp::method())
        .and(warp::path::full())
        .and(query)
        .and(warp::body::bytes())
        .and(with_server.clone())
        .then(handle_api);

    let get_scenario = warp::path!("__scenario")
        .and(warp::get())
        .and(with_server.clone())
        .map(|server: Arc<MockServer>| {
            reply(MockResponse::ok(&*server.scenarios().scenario_state()))
        });

    let put_scenario = warp::path!("__scenario")
        .and(warp::put())
        .and(with_server.clone())
        .and(warp::body::json())
        .map(|server: Arc<MockServer>, next: ScenarioState| {
            server.scenarios().set_scenario_state(next);
            reply(MockResponse::ok(&*server.scenarios().scenario_state()))
        });

    let get_role = warp::path!("__role")
        .and(warp::get())
        .and(with_server.clone())
        .map(|server: Arc<MockServer>| {
            reply(MockResponse::ok(&RoleBody {
                role: server.scenarios().role(),
            }))
        });

    let put_role = warp::path!("__role")
        .and(warp::put())
        .and(with_server.clone())
        .and(warp::body::bytes())
        .map(|server: Arc<MockServer>, raw: Bytes| match RoleBody::from_body(&raw) {
            Ok(body) => {
                server.scenarios().set_role(body.role);
                reply(MockResponse::ok(&body))
            }
            Err(e) => reply(e.into()),
        });

    let reset = warp::path!("__reset")
        .and(warp::post())
        .and(with_server)
        .map(|server: Arc<MockServer>| {
            server.scenarios().reset();
            tracing::info!("scenarios and role reset");
            reply(MockResponse::ok(&json!({ "ok": true })))
        });

    let control = get_scenario
        .or(put_scenario)
        .unify()
        .or(get_role)
        .unify()
        .or(put_role)
        .unify()
        .or(reset)
        .unify();

    let base = api.or(control).unify().boxed();
    let all = match spec_dir {
        Some(dir) => {
            tracing::debug!(dir = %dir.display(), "serving spec documents");
            let specs = warp::path("spec")
                .and(warp::fs::dir(dir))
                .map(|file: warp::filters::fs::File| file.into_response());
            base.or(specs).unify().boxed()
        }
        None => base,
    };

    all.recover(recover).with(warp::trace::request())
}

/// Bind `addr` and return the bound address with the server future
///
/// The future completes once `shutdown` has resolved and open requests have
/// drained, or [`SHUTDOWN_DRAIN`] after `shutdown` at the latest.
///
/// # Errors
/// `ServeError::Bind` if the listener cannot be bound.
pub fn bind<S>(
    server: Arc<MockServer>,
    addr: SocketAddr,
    spec_dir: Option<PathBuf>,
    shutdown: S,
) -> Result<(SocketAddr, impl Future<Output = ()> + Send + 'static), ServeError>
where
    S: Future<Output = ()> + Send + 'static,
{
    let requested = Arc::new(Notify::new());
    let notify = Arc::clone(&requested);
    let signal = async move {
        shutdown.await;
        notify.notify_one();
    };

    let (bound, running) =
        warp::serve(routes(server, spec_dir)).try_bind_with_graceful_shutdown(addr, signal)?;
    tracing::info!(%bound, "mock server listening");

    let stopped = async move {
        tokio::pin!(running);
        tokio::select! {
            () = &mut running => {}
            () = requested.notified() => {
                if tokio::time::timeout(SHUTDOWN_DRAIN, &mut running).await.is_err() {
                    tracing::warn!(
                        drain = ?SHUTDOWN_DRAIN,
                        "requests still pending after drain, dropping connections"
                    );
                }
            }
        }
        tracing::info!("mock server stopped");
    };
    Ok((bound, stopped))
}

/// Bind `addr` and serve until `shutdown` resolves
///
/// # Errors
/// `ServeError::Bind` if the listener cannot be bound.
pub async fn serve<S>(
    server: Arc<MockServer>,
    addr: SocketAddr,
    spec_dir: Option<PathBuf>,
    shutdown: S,
) -> Result<(), ServeError>
where
    S: Future<Output = ()> + Send + 'static,
{
    let (_, running) = bind(server, addr, spec_dir, shutdown)?;
    running.await;
    Ok(())
}

async fn handle_api(
    method: warp::http::Method,
    path: FullPath,
    query: String,
    body: Bytes,
    server: Arc<MockServer>,
) -> Response {
    let Ok(method) = method.as_str().parse::<Method>() else {
        return reply(MockResponse::error(
            status::METHOD_NOT_ALLOWED,
            "Method Not Allowed",
        ));
    };

    let mut request = MockRequest::new(method, path.as_str()).with_query_string(&query);
    if !body.is_empty() {
        request = request.with_body(String::from_utf8_lossy(&body).into_owned());
    }
    reply(server.handle(request).await)
}

fn reply(response: MockResponse) -> Response {
    let code = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    warp::reply::with_status(warp::reply::json(&response.body), code).into_response()
}

async fn recover(rejection: Rejection) -> Result<Response, Infallible> {
    let response = if rejection.is_not_found() {
        MockResponse::error(status::NOT_FOUND, "Not Found")
    } else if rejection
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        MockResponse::error(status::BAD_REQUEST, "Invalid JSON body")
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        MockResponse::error(status::METHOD_NOT_ALLOWED, "Method Not Allowed")
    } else {
        tracing::warn!(?rejection, "unhandled rejection");
        MockResponse::error(status::INTERNAL_SERVER_ERROR, "Internal Server Error")
    };
    Ok(reply(response))
}

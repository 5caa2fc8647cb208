//! Application bootstrap — configurator pipeline and the serving loop.
//!
//! [`App`] owns the middleware stack and the serving configuration. It is
//! shaped by a pipeline of [`Configurator`] functions, primed with the
//! built-in request logger via [`App::bootstrap`], and run with
//! [`App::listen`], which accepts TCP connections and dispatches HTTP/1.1
//! requests through the middleware chain into the handler.
//!
//! Handlers return `Result<Response, Exception>`; an `Err` is rendered as
//! the exception's status with a JSON `{"message", "code"}` body, so
//! application code propagates faults with `?` instead of hand-building
//! error responses.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use bytes::BytesMut;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

use crate::exception::{Exception, Fault};
use crate::http::{Request, Response, StatusCode, request::RequestError};
use crate::middleware::{Middleware, MiddlewareHandler, Next, RequestLogger, from_middleware};

pub mod config;

pub use config::{AppConfig, env_or};

/// Errors produced by the serving loop.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// A function that shapes the application instance before it starts
/// listening — registering middleware, adjusting config, and so on.
pub type Configurator = fn(&mut App);

/// The application state: serving configuration plus the ordered
/// middleware stack.
///
/// # Examples
///
/// ```rust,no_run
/// use nautilus::bootstrap::App;
/// use nautilus::http::{Response, StatusCode};
/// use nautilus::middleware::Cors;
///
/// #[tokio::main]
/// async fn main() -> Result<(), nautilus::bootstrap::ServerError> {
///     let mut app = App::new();
///     app.bootstrap().with(Cors::new());
///     app.listen(|_req| async { Ok(Response::new(StatusCode::Ok).body("hi")) })
///         .await
/// }
/// ```
pub struct App {
    config: AppConfig,
    middlewares: Vec<MiddlewareHandler>,
    spawn_date: SystemTime,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Creates an application with the default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Creates an application with the given configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            middlewares: Vec::new(),
            spawn_date: SystemTime::now(),
        }
    }

    /// Returns the serving configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns a mutable reference to the serving configuration, for use
    /// from configurators.
    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// Returns the instant the application value was created.
    pub fn spawn_date(&self) -> SystemTime {
        self.spawn_date
    }

    /// Returns how long this application instance has existed.
    pub fn uptime(&self) -> Duration {
        self.spawn_date.elapsed().unwrap_or_default()
    }

    /// Runs all given configurators in a pipeline, in order.
    pub fn configure(&mut self, configurators: &[Configurator]) -> &mut Self {
        for configurator in configurators {
            configurator(self);
        }
        self
    }

    /// Appends a middleware to the stack.
    pub fn with<M>(&mut self, middleware: M) -> &mut Self
    where
        M: Middleware + 'static,
    {
        self.middlewares.push(from_middleware(Arc::new(middleware)));
        self
    }

    /// Installs the base middleware every application wants: the request
    /// logger. Call before registering application-specific middleware.
    pub fn bootstrap(&mut self) -> &mut Self {
        self.with(RequestLogger)
    }

    /// Binds to the configured address and serves requests until the
    /// process terminates or the listener fails.
    ///
    /// Each request travels through the middleware stack and then into
    /// `handler`. A handler `Err` is rendered via [`Fault::to_response`].
    ///
    /// # Errors
    ///
    /// [`ServerError::Bind`] when the address cannot be bound;
    /// [`ServerError::Io`] when the listener itself fails.
    pub async fn listen<H, F>(self, handler: H) -> Result<(), ServerError>
    where
        H: Fn(Request) -> F + Send + Sync + 'static,
        F: Future<Output = Result<Response, Exception>> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.address.as_str())
            .await
            .map_err(|e| ServerError::Bind {
                addr: self.config.address.clone(),
                source: e,
            })?;
        let local_addr = listener.local_addr()?;
        info!(address = %local_addr, "nautilus listening");

        let mut stack = self.middlewares;
        stack.push(terminal_stage(Arc::new(handler)));
        let stack = Arc::new(stack);
        let config = Arc::new(self.config);

        loop {
            let (stream, peer_addr) = match listener.accept().await {
                Ok(pair) => pair,
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            debug!(peer = %peer_addr, "connection accepted");
            let stack = Arc::clone(&stack);
            let config = Arc::clone(&config);

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, peer_addr, stack, config).await {
                    warn!(peer = %peer_addr, error = %e, "connection closed with error");
                }
            });
        }
    }
}

/// Wraps the application handler as the last stage of the middleware
/// chain, rendering faults as JSON error responses.
fn terminal_stage<H, F>(handler: Arc<H>) -> MiddlewareHandler
where
    H: Fn(Request) -> F + Send + Sync + 'static,
    F: Future<Output = Result<Response, Exception>> + Send + 'static,
{
    Arc::new(move |req: Request, _next: Next| {
        let handler = Arc::clone(&handler);
        Box::pin(async move {
            match handler(req).await {
                Ok(response) => response,
                Err(fault) => fault.to_response(),
            }
        })
    })
}

/// Handles a single TCP connection over its lifetime.
///
/// HTTP/1.1 connections are persistent by default: one request per loop
/// iteration until the peer closes the connection or signals
/// `Connection: close`.
async fn handle_connection(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    stack: Arc<Vec<MiddlewareHandler>>,
    config: Arc<AppConfig>,
) -> Result<(), std::io::Error> {
    let mut buf = BytesMut::with_capacity(config.read_buffer_size);

    loop {
        let bytes_read = stream.read_buf(&mut buf).await?;

        if bytes_read == 0 {
            debug!(peer = %peer_addr, "connection closed by peer");
            break;
        }

        // Guard against excessively large requests.
        if buf.len() > config.max_request_size {
            warn!(peer = %peer_addr, "request too large — sending 413");
            let response = Response::new(StatusCode::PayloadTooLarge)
                .body("Request entity too large")
                .keep_alive(false);
            stream.write_all(&response.into_bytes()).await?;
            break;
        }

        // Attempt to parse the buffered data as an HTTP request.
        let (request, body_offset) = match Request::parse(&buf) {
            Ok(pair) => pair,
            Err(RequestError::Incomplete) => {
                // Headers not yet fully received — read more data.
                continue;
            }
            Err(e) => {
                warn!(peer = %peer_addr, error = %e, "bad request — sending 400");
                let response = Response::new(StatusCode::BadRequest)
                    .body(format!("Bad Request: {e}"))
                    .keep_alive(false);
                stream.write_all(&response.into_bytes()).await?;
                break;
            }
        };

        // Wait for the full body to arrive if Content-Length is set.
        let content_length = request.content_length().unwrap_or(0);
        let total_needed = body_offset + content_length;
        if buf.len() < total_needed {
            continue;
        }

        let keep_alive = request.is_keep_alive();

        debug!(
            peer = %peer_addr,
            method = %request.method(),
            path = %request.path(),
            "dispatching request"
        );

        let response = Next::new(stack.as_ref().clone()).run(request).await;
        stream.write_all(&response.into_bytes()).await?;
        stream.flush().await?;

        // Drop the consumed request bytes from the buffer.
        let _ = buf.split_to(total_needed);

        if !keep_alive {
            debug!(peer = %peer_addr, "Connection: close — shutting down");
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request(target: &str) -> Request {
        let raw = format!("GET {target} HTTP/1.1\r\nHost: example.com\r\n\r\n");
        Request::parse(raw.as_bytes()).unwrap().0
    }

    #[test]
    fn configurators_run_in_order() {
        let mut app = App::new();
        app.configure(&[
            |app: &mut App| app.config_mut().address = "127.0.0.1:9001".to_owned(),
            |app: &mut App| app.config_mut().read_buffer_size = 1024,
        ]);
        assert_eq!(app.config().address, "127.0.0.1:9001");
        assert_eq!(app.config().read_buffer_size, 1024);
    }

    #[tokio::test]
    async fn terminal_stage_passes_through_ok() {
        let stage = terminal_stage(Arc::new(|_req: Request| async {
            Ok(Response::new(StatusCode::Created).body("made"))
        }));

        let response = Next::new(vec![stage]).run(make_request("/")).await;
        assert_eq!(response.status(), StatusCode::Created);
    }

    #[tokio::test]
    async fn terminal_stage_renders_faults_as_json() {
        let stage = terminal_stage(Arc::new(|_req: Request| async {
            Err::<Response, _>(Exception::new(
                StatusCode::UnprocessableEntity,
                "bad payload",
                "errors.bad_payload",
            ))
        }));

        let response = Next::new(vec![stage]).run(make_request("/")).await;
        assert_eq!(response.status(), StatusCode::UnprocessableEntity);

        let bytes = response.into_bytes();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.contains("Content-Type: application/json"));
        assert!(text.ends_with(r#"{"code":"LIB_ERR","message":"bad payload"}"#));
    }

    #[tokio::test]
    async fn full_stack_dispatch_with_middleware() {
        let stage = terminal_stage(Arc::new(|_req: Request| async {
            Ok(Response::new(StatusCode::Ok))
        }));
        let cors = from_middleware(Arc::new(crate::middleware::Cors::new()));

        let response = Next::new(vec![cors, stage]).run(make_request("/")).await;
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(
            response.headers().get("Access-Control-Allow-Origin"),
            Some("*")
        );
    }
}

//! Middleware pipeline — composable before/after request handler logic.
//!
//! Each middleware wraps the next layer, enabling request inspection,
//! short-circuit responses, and response decoration without coupling
//! handlers to infrastructure concerns.
//!
//! - [`Middleware`] — trait implemented by all middleware.
//! - [`Next`] — cursor into the remaining chain; call [`Next::run`] to
//!   advance to the next layer.
//! - [`MiddlewareHandler`] — type-erased, cheaply-cloneable middleware function.
//! - [`RequestLogger`] — built-in request/response logger.
//! - [`cors::Cors`] — CORS response-header injection.

use std::{future::Future, pin::Pin, sync::Arc};

use tokio::time::Instant;

use crate::http::{Request, Response, StatusCode};

pub mod cors;

pub use cors::Cors;

/// A type-erased, reference-counted middleware function.
///
/// Every entry in the middleware stack is stored as a `MiddlewareHandler`;
/// the [`Arc`] makes handlers cheap to clone so [`Next`] can advance through
/// the chain without copying closures.
pub type MiddlewareHandler = Arc<
    dyn Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync + 'static,
>;

/// The core middleware trait.
///
/// Implementors receive the [`Request`] and a [`Next`] cursor and may pass
/// through, short-circuit with their own [`Response`], or decorate the
/// downstream response. Implementations must be `Send + Sync`: middleware is
/// shared across connection tasks.
pub trait Middleware: Send + Sync {
    /// Handle the request and optionally delegate to the next layer.
    fn handle(&self, req: Request, next: Next)
    -> Pin<Box<dyn Future<Output = Response> + Send>>;
}

/// Converts a [`Middleware`] implementation into a [`MiddlewareHandler`].
pub fn from_middleware<M>(middleware: Arc<M>) -> MiddlewareHandler
where
    M: Middleware + 'static,
{
    Arc::new(move |req: Request, next: Next| middleware.handle(req, next))
}

/// A cursor into the remaining middleware chain for a single request.
///
/// `Next` is consumed by [`run`](Self::run), so it cannot be invoked more
/// than once per middleware layer.
pub struct Next {
    middlewares: Vec<MiddlewareHandler>,
    index: usize,
}

impl Next {
    /// Creates a `Next` positioned at the start of the given stack.
    pub fn new(middlewares: Vec<MiddlewareHandler>) -> Self {
        Self {
            middlewares,
            index: 0,
        }
    }

    /// Invokes the next layer in the chain and returns its response.
    ///
    /// When the chain is exhausted without any layer producing a response, a
    /// `500 Internal Server Error` fallback is returned.
    pub async fn run(mut self, req: Request) -> Response {
        if self.index < self.middlewares.len() {
            let handler = self.middlewares[self.index].clone();
            self.index += 1;
            handler(req, self).await
        } else {
            Response::new(StatusCode::InternalServerError)
                .body("no response generated by middleware pipeline")
        }
    }
}

/// Built-in middleware that logs each request's method, path, status, and
/// duration through `tracing`. Never short-circuits.
pub struct RequestLogger;

impl Middleware for RequestLogger {
    fn handle(
        &self,
        req: Request,
        next: Next,
    ) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        Box::pin(async move {
            let start = Instant::now();
            let method = req.method().as_str().to_owned();
            let path = req.path().to_owned();

            let response = next.run(req).await;

            tracing::info!(
                %method,
                %path,
                status = response.status().as_u16(),
                elapsed = ?start.elapsed(),
                "request handled"
            );

            response
        })
    }
}

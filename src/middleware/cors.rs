//! CORS response-header injection.

use std::future::Future;
use std::pin::Pin;

use crate::http::{Request, Response};

use super::{Middleware, Next};

const DEFAULT_ORIGINS: &str = "*";
const DEFAULT_METHODS: &str = "GET,HEAD,OPTIONS,POST,PUT,PATCH,DELETE";
const DEFAULT_HEADERS: &str = "Accept,Authorization,Cache-Control,Content-Type,X-Requested-With";

/// Middleware that stamps `Access-Control-*` headers on every response.
///
/// An empty allow-list means "use the permissive default", not "allow
/// nothing": origins default to `*`, methods and headers to the common sets
/// above, and credentials are allowed unless switched off.
///
/// # Examples
///
/// ```
/// use nautilus::middleware::Cors;
///
/// let cors = Cors::new()
///     .allow_origin("https://app.example.com")
///     .allow_header("X-Request-Id")
///     .disable_credentials();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Cors {
    allowed_origins: Vec<String>,
    allowed_methods: Vec<String>,
    allowed_headers: Vec<String>,
    disable_credentials: bool,
}

impl Cors {
    /// Creates a CORS policy with every setting at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an allowed origin. The configured origins are sent as a
    /// comma-joined list; leaving the list empty sends `*`.
    #[must_use]
    pub fn allow_origin(mut self, origin: impl Into<String>) -> Self {
        self.allowed_origins.push(origin.into());
        self
    }

    /// Adds an allowed HTTP method to the advertised set.
    #[must_use]
    pub fn allow_method(mut self, method: impl Into<String>) -> Self {
        self.allowed_methods.push(method.into());
        self
    }

    /// Adds an allowed request header to the advertised set.
    #[must_use]
    pub fn allow_header(mut self, header: impl Into<String>) -> Self {
        self.allowed_headers.push(header.into());
        self
    }

    /// Advertises `Access-Control-Allow-Credentials: false`.
    #[must_use]
    pub fn disable_credentials(mut self) -> Self {
        self.disable_credentials = true;
        self
    }

    /// Stamps the four `Access-Control-*` headers onto `response`,
    /// replacing any existing values.
    pub fn apply(&self, response: &mut Response) {
        let origins = join_or(&self.allowed_origins, DEFAULT_ORIGINS);
        let methods = join_or(&self.allowed_methods, DEFAULT_METHODS);
        let headers = join_or(&self.allowed_headers, DEFAULT_HEADERS);
        let credentials = if self.disable_credentials {
            "false"
        } else {
            "true"
        };

        response.set_header("Access-Control-Allow-Origin", origins);
        response.set_header("Access-Control-Allow-Methods", methods);
        response.set_header("Access-Control-Allow-Headers", headers);
        response.set_header("Access-Control-Allow-Credentials", credentials);
    }
}

fn join_or(values: &[String], fallback: &str) -> String {
    if values.is_empty() {
        fallback.to_owned()
    } else {
        values.join(",")
    }
}

impl Middleware for Cors {
    /// Runs the rest of the chain, then decorates the response. Never
    /// short-circuits.
    fn handle(
        &self,
        req: Request,
        next: Next,
    ) -> Pin<Box<dyn Future<Output = Response> + Send>> {
        let policy = self.clone();
        Box::pin(async move {
            let mut response = next.run(req).await;
            policy.apply(&mut response);
            response
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::http::StatusCode;
    use crate::middleware::{MiddlewareHandler, from_middleware};

    #[test]
    fn default_policy_is_permissive() {
        let mut response = Response::new(StatusCode::Ok);
        Cors::new().apply(&mut response);

        let headers = response.headers();
        assert_eq!(headers.get("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(
            headers.get("Access-Control-Allow-Methods"),
            Some(DEFAULT_METHODS)
        );
        assert_eq!(
            headers.get("Access-Control-Allow-Headers"),
            Some(DEFAULT_HEADERS)
        );
        assert_eq!(headers.get("Access-Control-Allow-Credentials"), Some("true"));
    }

    #[test]
    fn configured_values_replace_defaults() {
        let cors = Cors::new()
            .allow_origin("https://a.example.com")
            .allow_origin("https://b.example.com")
            .allow_method("GET")
            .disable_credentials();

        let mut response = Response::new(StatusCode::Ok);
        cors.apply(&mut response);

        let headers = response.headers();
        assert_eq!(
            headers.get("Access-Control-Allow-Origin"),
            Some("https://a.example.com,https://b.example.com")
        );
        assert_eq!(headers.get("Access-Control-Allow-Methods"), Some("GET"));
        assert_eq!(
            headers.get("Access-Control-Allow-Credentials"),
            Some("false")
        );
    }

    #[test]
    fn apply_replaces_stale_values() {
        let mut response = Response::new(StatusCode::Ok)
            .header("Access-Control-Allow-Origin", "https://stale.example.com");
        Cors::new().apply(&mut response);
        assert_eq!(
            response.headers().get("Access-Control-Allow-Origin"),
            Some("*")
        );
        assert_eq!(
            response
                .headers()
                .get_all("Access-Control-Allow-Origin")
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn middleware_decorates_downstream_response() {
        let terminal: MiddlewareHandler = Arc::new(|_req, _next| {
            Box::pin(async { Response::new(StatusCode::Ok).body("hi") })
        });
        let cors = from_middleware(Arc::new(Cors::new().allow_origin("https://x.example.com")));

        let raw = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let req = Request::parse(raw).unwrap().0;

        let response = crate::middleware::Next::new(vec![cors, terminal])
            .run(req)
            .await;
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(
            response.headers().get("access-control-allow-origin"),
            Some("https://x.example.com")
        );
    }
}

//! # nautilus
//!
//! Building blocks for async web services: URL parsing and building, CORS
//! header injection, string case conversion, and the bootstrap glue that
//! wires them into a running application.
//!
//! ## Quick Start
//!
//! ```rust
//! use nautilus::url::{QueryMap, Url};
//!
//! let mut url = Url::parse("https://api.example.com/v1?active=true").unwrap();
//! assert_eq!(url.domain(), "example.com");
//! assert_eq!(url.subdomain(), "api");
//!
//! let mut params = QueryMap::new();
//! params.insert("page".into(), 2i64.into());
//! url.append_path_and_query("users", &params);
//!
//! assert_eq!(url.to_string(), "https://api.example.com/v1/users?page=2");
//! ```

pub mod bootstrap;
pub mod exception;
pub mod http;
pub mod middleware;
pub mod strings;
pub mod url;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use bootstrap::{App, AppConfig, ServerError};
pub use exception::{Exception, Fault};
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use middleware::{Cors, Middleware, Next, RequestLogger};
pub use url::{QueryMap, QueryValue, Url, UrlError, UserInfo};

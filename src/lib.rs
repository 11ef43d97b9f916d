//! # paramconv
//!
//! Request-parameter binding for HTTP services. One middleware, one trait.
//!
//! ## The contract
//!
//! A handler should receive typed input, not dig through query strings and
//! bodies. [`ParamConverter`] merges every parameter a request carries into a
//! single [`Params`] bag and lets your [`Facade`] turn it into a typed value:
//!
//! | Source | When | Notes |
//! |---|---|---|
//! | URL query | always | applied first |
//! | JSON body | `Content-Type: application/json` | native JSON types kept |
//! | multipart body | `Content-Type: multipart/form-data` | non-file fields only |
//! | url-encoded body | `Content-Type: application/x-www-form-urlencoded` | |
//!
//! Body fields overwrite query fields with the same key. Keys ending in `[]`
//! collect every value; other repeated keys keep the first.
//!
//! A malformed JSON body or a facade that refuses its parameters ends the
//! request with `400 Bad Request` and an empty body. Unreadable form and
//! multipart bodies just contribute nothing.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use paramconv::{Facade, Method, ParamError, Params, Request, Response, Router, Server, StatusCode};
//! use paramconv::middleware::param_converter;
//!
//! #[derive(Default)]
//! struct Page {
//!     number: u32,
//! }
//!
//! impl Facade for Page {
//!     type Error = ParamError;
//!
//!     fn deserialize(&mut self, params: &Params) -> Result<(), ParamError> {
//!         self.number = params.parse("page")?;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .on(Method::GET, "/articles", param_converter(Page::default, list_articles));
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn list_articles(req: Request) -> Response {
//!     let Some(page) = req.facade::<Page>() else {
//!         return Response::status(StatusCode::INTERNAL_SERVER_ERROR);
//!     };
//!     Response::text(format!("page {}", page.number))
//! }
//! ```

mod error;
mod extract;
mod facade;
mod handler;
mod params;
mod request;
mod response;
mod router;
mod server;

pub mod config;
pub mod middleware;

pub use config::Config;
pub use error::Error;
pub use extract::{Values, extract, group, parse_urlencoded};
pub use facade::Facade;
pub use handler::Handler;
pub use http::{Method, StatusCode};
pub use middleware::{ParamConverter, Rejection};
pub use params::{ParamError, Params, Value};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::{DEFAULT_MAX_BODY_SIZE, Server};

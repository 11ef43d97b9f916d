//! Parameter conversion middleware.
//!
//! For each request the converter merges four sources into one [`Params`],
//! later sources overwriting earlier ones:
//!
//! 1. the URL query string (always)
//! 2. the body, chosen by the `Content-Type` media type (exact, case-sensitive):
//!    - `application/json`: top-level object fields, native JSON types kept
//!    - `multipart/form-data`: non-file fields
//!    - `application/x-www-form-urlencoded`: form fields
//!
//! A fresh facade from the factory then binds the bag. Malformed JSON or a
//! failed bind answers `400 Bad Request` with an empty body and the wrapped
//! handler never runs. Unreadable form or multipart bodies contribute
//! nothing; the facade decides whether the remaining parameters suffice.
//!
//! ```rust,no_run
//! use paramconv::{Facade, Method, ParamError, Params, Request, Response, Router, StatusCode};
//! use paramconv::middleware::param_converter;
//!
//! #[derive(Default)]
//! struct Lookup { id: u64 }
//!
//! impl Facade for Lookup {
//!     type Error = ParamError;
//!     fn deserialize(&mut self, params: &Params) -> Result<(), ParamError> {
//!         self.id = params.parse("id")?;
//!         Ok(())
//!     }
//! }
//!
//! async fn show(req: Request) -> Response {
//!     match req.facade::<Lookup>() {
//!         Some(lookup) => Response::text(lookup.id.to_string()),
//!         None => Response::status(StatusCode::INTERNAL_SERVER_ERROR),
//!     }
//! }
//!
//! let app = Router::new().on(Method::GET, "/items", param_converter(Lookup::default, show));
//! ```

use std::io;
use std::marker::PhantomData;
use std::sync::Arc;

use futures_util::stream;
use http::StatusCode;
use http::header::CONTENT_TYPE;
use serde_json::Map;
use tracing::{debug, warn};

use crate::config::Config;
use crate::extract::{self, Values};
use crate::facade::Facade;
use crate::handler::{BoxedHandler, Handler};
use crate::params::{Params, Value};
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// Why a request was turned away before reaching the wrapped handler.
///
/// Every variant answers `400 Bad Request` with an empty body.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    #[error("undecodable json body: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("json body holds no value")]
    EmptyJson,

    /// The facade refused the parameters; carries its error message.
    #[error("param conversion error: {0}")]
    Binding(String),
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        Response::status(StatusCode::BAD_REQUEST)
    }
}

/// A form or multipart body that could not be read. Never fatal.
#[derive(Debug, thiserror::Error)]
enum FormError {
    #[error("multipart: {0}")]
    Multipart(#[from] multer::Error),

    #[error("urlencoded: {0}")]
    Urlencoded(#[from] serde_urlencoded::de::Error),

    #[error("body exceeds {limit} bytes")]
    TooLarge { limit: u64 },
}

/// The body sources the converter understands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum BodyKind {
    Json,
    Multipart,
    Form,
}

impl BodyKind {
    /// Matches the media type, ignoring parameters such as `boundary` or
    /// `charset`.
    fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        if essence == mime::APPLICATION_JSON.essence_str() {
            Some(Self::Json)
        } else if essence == mime::MULTIPART_FORM_DATA.essence_str() {
            Some(Self::Multipart)
        } else if essence == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str() {
            Some(Self::Form)
        } else {
            None
        }
    }
}

// ── ParamConverter ────────────────────────────────────────────────────────────

/// Binds request parameters into a facade of type `F`.
///
/// `factory` runs once per request, so no facade state leaks between
/// concurrent requests. Limits come from [`Config::global`] unless set with
/// [`config`](Self::config).
pub struct ParamConverter<F, B> {
    factory: B,
    config: Config,
    _facade: PhantomData<fn() -> F>,
}

impl<F, B> ParamConverter<F, B>
where
    F: Facade,
    B: Fn() -> F + Send + Sync + 'static,
{
    pub fn new(factory: B) -> Self {
        Self { factory, config: Config::global(), _facade: PhantomData }
    }

    /// Overrides the process-wide limits for this converter.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Wraps `next`. The result is a [`Handler`] that binds `F`, stores it on
    /// the request (see [`Request::facade`]) and calls `next`.
    pub fn wrap(self, next: impl Handler) -> impl Handler {
        let layer = Arc::new(Layer { converter: self, next: next.into_boxed_handler() });
        move |req: Request| {
            let layer = Arc::clone(&layer);
            async move { layer.handle(req).await }
        }
    }

    /// Collects the request's parameters and binds a fresh facade.
    ///
    /// This is what [`wrap`](Self::wrap) runs before the wrapped handler; call
    /// it directly to get the facade back as a value.
    pub async fn bind(&self, req: &Request) -> Result<F, Rejection> {
        let params = self.collect(req).await?;
        let mut facade = (self.factory)();
        facade
            .deserialize(&params)
            .map_err(|e| Rejection::Binding(e.to_string()))?;
        Ok(facade)
    }

    /// Builds the merged parameter bag for `req`.
    ///
    /// Body keys replace query keys outright. An array key (`k[]`) sent in
    /// both places keeps only the body's values; the two lists are never
    /// concatenated.
    pub async fn collect(&self, req: &Request) -> Result<Params, Rejection> {
        let mut params = extract::extract(query_values(req), Params::new());

        let Some(kind) = req.header(CONTENT_TYPE.as_str()).and_then(BodyKind::from_content_type) else {
            return Ok(params);
        };

        let body = match kind {
            BodyKind::Json => {
                merge_json(req.body(), &mut params)?;
                return Ok(params);
            }
            BodyKind::Multipart => read_multipart(req, self.config.multipart_value_limit()).await,
            BodyKind::Form => read_form(req.body(), self.config.get_max_form_size()),
        };

        match body {
            Ok(values) => Ok(extract::extract(values, params)),
            Err(e) => {
                debug!(error = %e, kind = ?kind, "ignoring unreadable form body");
                Ok(params)
            }
        }
    }
}

/// Shorthand for `ParamConverter::new(factory).wrap(next)`.
///
/// ```rust,no_run
/// # use paramconv::{Facade, Params, Request, Response};
/// # use paramconv::middleware::param_converter;
/// # #[derive(Default)] struct Empty;
/// # impl Facade for Empty {
/// #     type Error = std::convert::Infallible;
/// #     fn deserialize(&mut self, _: &Params) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// # async fn handler(_: Request) -> Response { Response::text("") }
/// let handler = param_converter(Empty::default, handler);
/// ```
pub fn param_converter<F, B>(factory: B, next: impl Handler) -> impl Handler
where
    F: Facade,
    B: Fn() -> F + Send + Sync + 'static,
{
    ParamConverter::new(factory).wrap(next)
}

struct Layer<F, B> {
    converter: ParamConverter<F, B>,
    next: BoxedHandler,
}

impl<F, B> Layer<F, B>
where
    F: Facade,
    B: Fn() -> F + Send + Sync + 'static,
{
    async fn handle(&self, mut req: Request) -> Response {
        match self.converter.bind(&req).await {
            Ok(facade) => {
                req.bind(facade);
                self.next.call(req).await
            }
            Err(rejection) => {
                warn!(method = %req.method(), path = req.path(), "{rejection}");
                rejection.into_response()
            }
        }
    }
}

// ── Sources ───────────────────────────────────────────────────────────────────

fn query_values(req: &Request) -> Values {
    let Some(query) = req.query() else {
        return Values::new();
    };
    extract::parse_urlencoded(query.as_bytes()).unwrap_or_else(|e| {
        debug!(error = %e, "ignoring unreadable query string");
        Values::new()
    })
}

/// Decodes the first JSON value of `body` over `params`.
///
/// A zero-length body is treated as absent. `null` adds nothing; any other
/// non-object value is malformed.
fn merge_json(body: &[u8], params: &mut Params) -> Result<(), Rejection> {
    if body.is_empty() {
        return Ok(());
    }

    let mut values = serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<Map<String, serde_json::Value>>>();

    match values.next() {
        Some(Ok(Some(object))) => {
            for (key, value) in object {
                params.insert(key, Value::Json(value));
            }
            Ok(())
        }
        Some(Ok(None)) => Ok(()),
        Some(Err(e)) => Err(e.into()),
        None => Err(Rejection::EmptyJson),
    }
}

fn read_form(body: &[u8], limit: usize) -> Result<Values, FormError> {
    if body.len() > limit {
        return Err(FormError::TooLarge { limit: limit as u64 });
    }
    Ok(extract::parse_urlencoded(body)?)
}

/// Reads the non-file fields of a multipart body. File parts are skipped
/// without being buffered.
async fn read_multipart(req: &Request, limit: u64) -> Result<Values, FormError> {
    let content_type = req.header(CONTENT_TYPE.as_str()).unwrap_or_default();
    let boundary = multer::parse_boundary(content_type)?;

    let body = req.body.clone();
    let stream = stream::once(async move { Ok::<_, io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut pairs = Vec::new();
    let mut used: u64 = 0;
    while let Some(field) = multipart.next_field().await? {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().filter(|n| !n.is_empty()).map(str::to_owned) else {
            continue;
        };

        let value = field.text().await?;
        used = used.saturating_add(value.len() as u64);
        if used > limit {
            return Err(FormError::TooLarge { limit });
        }
        pairs.push((name, value));
    }

    Ok(extract::group(pairs))
}

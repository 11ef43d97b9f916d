//! Middleware layer.
//!
//! Middleware wraps a [`Handler`](crate::Handler) and hands back another one,
//! so it registers on the [`Router`](crate::Router) like any route handler.
//!
//! Built-in middleware:
//! - [`param_converter()`]: binds query / form / multipart / JSON parameters
//!   into a typed [`Facade`](crate::Facade) before the wrapped handler runs

pub mod param_converter;

pub use param_converter::{ParamConverter, Rejection, param_converter};

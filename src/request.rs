//! Incoming HTTP request type.

use std::any::Any;
use std::collections::HashMap;

use bytes::Bytes;
use http::request::Parts;
use http::{HeaderMap, Method, Uri};

use crate::facade::Facade;

/// An incoming HTTP request with its body already collected.
pub struct Request {
    pub(crate) parts: Parts,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
    bound: Option<Box<dyn Any + Send + Sync>>,
}

impl Request {
    pub(crate) fn new(parts: Parts, body: Bytes, params: HashMap<String, String>) -> Self {
        Self { parts, body, params, bound: None }
    }

    pub fn method(&self) -> &Method { &self.parts.method }
    pub fn uri(&self) -> &Uri { &self.parts.uri }
    pub fn path(&self) -> &str { self.parts.uri.path() }
    pub fn query(&self) -> Option<&str> { self.parts.uri.query() }
    pub fn headers(&self) -> &HeaderMap { &self.parts.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The facade bound by an upstream [`ParamConverter`](crate::ParamConverter).
    ///
    /// Returns `None` if nothing was bound or if it was bound as a different
    /// type. Answering that case (usually with a 500) is up to the handler.
    pub fn facade<F: Facade>(&self) -> Option<&F> {
        self.bound.as_deref()?.downcast_ref()
    }

    /// Moves the bound facade out of the request.
    ///
    /// On a type mismatch the facade stays in place and `None` is returned.
    pub fn take_facade<F: Facade>(&mut self) -> Option<F> {
        match self.bound.take()?.downcast::<F>() {
            Ok(facade) => Some(*facade),
            Err(other) => {
                self.bound = Some(other);
                None
            }
        }
    }

    pub(crate) fn bind<F: Facade>(&mut self, facade: F) {
        self.bound = Some(Box::new(facade));
    }
}

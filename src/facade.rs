//! The binder contract between the converter and application code.

use std::fmt;

use crate::params::Params;

/// A typed view of a request's parameters.
///
/// A [`ParamConverter`](crate::ParamConverter) builds a fresh value through
/// its factory for every request, feeds it the merged [`Params`], and hands
/// it to the next handler on success. Returning `Err` rejects the request
/// with `400 Bad Request`; the error's `Display` output is logged.
///
/// ```rust
/// use paramconv::{Facade, ParamError, Params};
///
/// #[derive(Default)]
/// struct Search {
///     page: u32,
///     tags: Vec<String>,
/// }
///
/// impl Facade for Search {
///     type Error = ParamError;
///
///     fn deserialize(&mut self, params: &Params) -> Result<(), ParamError> {
///         self.page = params.parse("page")?;
///         self.tags = params.list("tags")
///             .unwrap_or_default()
///             .into_iter()
///             .map(str::to_owned)
///             .collect();
///         Ok(())
///     }
/// }
/// ```
pub trait Facade: Send + Sync + 'static {
    type Error: fmt::Display;

    /// Populates `self` from `params`.
    fn deserialize(&mut self, params: &Params) -> Result<(), Self::Error>;
}

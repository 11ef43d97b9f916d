//! Process-wide converter settings.
//!
//! Set once at startup, before the server accepts traffic:
//!
//! ```rust
//! use paramconv::config::{self, Config};
//!
//! config::init(Config::new().multipart_max_memory(1 << 20)).unwrap();
//! assert_eq!(Config::global().get_multipart_max_memory(), 1 << 20);
//! ```
//!
//! Every [`ParamConverter`](crate::ParamConverter) built afterwards picks the
//! global up, unless it was handed its own via
//! [`ParamConverter::config`](crate::ParamConverter::config).

use std::sync::OnceLock;

use crate::error::Error;

/// Default multipart memory budget for uploaded files: none.
pub const DEFAULT_MULTIPART_MAX_MEMORY: u64 = 0;

/// Allowance for non-file multipart fields on top of the memory budget.
pub const MULTIPART_VALUE_ALLOWANCE: u64 = 10 << 20;

/// Default ceiling for url-encoded bodies (10 MiB).
pub const DEFAULT_MAX_FORM_SIZE: usize = 10 << 20;

static GLOBAL: OnceLock<Config> = OnceLock::new();

/// Parsing limits for form and multipart bodies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    multipart_max_memory: u64,
    max_form_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            multipart_max_memory: DEFAULT_MULTIPART_MAX_MEMORY,
            max_form_size: DEFAULT_MAX_FORM_SIZE,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide config, or the defaults if [`init`] was never called.
    pub fn global() -> Self {
        GLOBAL.get().copied().unwrap_or_default()
    }

    /// Memory budget in bytes for multipart bodies.
    ///
    /// File parts are never kept; the budget plus
    /// [`MULTIPART_VALUE_ALLOWANCE`] bounds the non-file field bytes.
    pub fn multipart_max_memory(mut self, bytes: u64) -> Self {
        self.multipart_max_memory = bytes;
        self
    }

    /// Largest url-encoded body that will be parsed, in bytes.
    pub fn max_form_size(mut self, bytes: usize) -> Self {
        self.max_form_size = bytes;
        self
    }

    pub fn get_multipart_max_memory(&self) -> u64 {
        self.multipart_max_memory
    }

    pub fn get_max_form_size(&self) -> usize {
        self.max_form_size
    }

    pub(crate) fn multipart_value_limit(&self) -> u64 {
        self.multipart_max_memory.saturating_add(MULTIPART_VALUE_ALLOWANCE)
    }
}

/// Installs the process-wide config. Only the first call wins.
pub fn init(config: Config) -> Result<(), Error> {
    GLOBAL.set(config).map_err(|_| Error::ConfigAlreadySet)
}

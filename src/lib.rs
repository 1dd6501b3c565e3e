#![warn(missing_debug_implementations, rust_2018_idioms)]

//! URI canonicalization for web archives.
//!
//! This crate parses arbitrary, often malformed, URI strings into a
//! normalized comparable form usable as a fetch target, a deduplication
//! key, or a sortable SURT key that clusters URIs by reversed host.
//! Parsing is driven by an immutable [`UriConfig`] bundling a grammar
//! parser flavor (strict RFC 3986, lax, or browser-mimicking), a reference
//! resolver, three normalizer rule lists and a rendering [`UriFormat`].
//!
//! # Examples
//!
//! Canonicalize and render SURT keys:
//!
//! ```
//! assert_eq!(surt_uri::surt("http://www.archive.org/")?, "org,archive)/");
//! assert_eq!(
//!     surt_uri::surt("http://archive.org/goo/?b&a")?,
//!     "org,archive)/goo?a&b"
//! );
//! # Ok::<_, surt_uri::UriError>(())
//! ```
//!
//! Parse with the shared lax configuration:
//!
//! ```
//! let uri = surt_uri::parse("HTTP://www.Example.COM./%7Euser/?b=2&a=1")?;
//! assert_eq!(uri.to_string(), "http://www.example.com/~user/?b=2&a=1");
//! assert_eq!(uri.parsed_query().to_string(), "a=1&b=2");
//! # Ok::<_, surt_uri::UriError>(())
//! ```
//!
//! Resolve a relative reference:
//!
//! ```
//! use surt_uri::UriConfig;
//!
//! let config = UriConfig::lax().build();
//! let uri = config.resolve("http://a/b/c/d;p?q", "../..")?;
//! assert_eq!(uri.to_string(), "http://a/");
//! # Ok::<_, surt_uri::UriError>(())
//! ```
//!
//! Configurations are immutable and freely shareable; build one per
//! behavior at startup and reuse it from any number of threads.

pub mod encoding;
pub mod error;
pub mod rules;
pub mod scheme;

mod builder;
mod config;
mod format;
mod ip;
mod normalizer;
mod parser;
mod query;
mod resolver;
mod surt;
mod uri;

pub use builder::{HostKind, UriBuilder};
pub use config::{
    UriConfig, UriConfigBuilder, UriInput, DEFAULT_MAX_URL_LENGTH, LEGACY_MAX_URL_LENGTH,
};
pub use error::{AuthorityError, Component, UriError};
pub use format::UriFormat;
pub use normalizer::{InParseNormalizer, PostParseNormalizer, PreParseNormalizer};
pub use parser::{ParserFlavor, Rfc3986Parser, UriParser};
pub use query::{ParsedQuery, QueryEntry};
pub use resolver::ReferenceResolver;
pub use surt::{DefaultSurtEncoder, LegacySurtEncoder, SurtEncoder};
pub use uri::Uri;

use once_cell::sync::Lazy;

static DEFAULT_CONFIG: Lazy<UriConfig> = Lazy::new(|| UriConfig::lax().build());

static SURT_CONFIG: Lazy<UriConfig> = Lazy::new(|| UriConfig::surt_key().build());

/// Parses `input` with a shared [lax](UriConfig::lax) configuration.
pub fn parse(input: &str) -> Result<Uri, UriError> {
    DEFAULT_CONFIG.parse(input)
}

/// Renders the SURT key of `input` using a shared
/// [SURT-key](UriConfig::surt_key) configuration.
pub fn surt(input: &str) -> Result<String, UriError> {
    SURT_CONFIG.parse(input).map(|uri| uri.to_string())
}

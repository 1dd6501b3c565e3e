//! The three normalizer hook points.
//!
//! Rules are stateless and shareable; they read the configuration and never
//! mutate it. Each list runs in order, so later rules observe the effects
//! of earlier ones. The stock rules live in [`crate::rules`].

use crate::{builder::UriBuilder, config::UriConfig, error::UriError};
use core::fmt;

/// A rule rewriting the raw string before any parsing happens.
pub trait PreParseNormalizer: fmt::Debug + Send + Sync {
    /// Gates the rule; a rule that returns `false` is skipped.
    fn valid_for(&self, input: &str) -> bool {
        let _ = input;
        true
    }

    /// Whether the rule also applies when parsing the reference side of a
    /// resolve operation. Scheme inference, for one, must not.
    fn applies_to_reference(&self) -> bool {
        true
    }

    /// Rewrites the raw URI string.
    fn normalize(&self, input: String, config: &UriConfig) -> Result<String, UriError>;
}

/// A hook firing while the authority is being parsed, after the authority
/// or host text is identified but before it is validated.
pub trait InParseNormalizer: fmt::Debug + Send + Sync {
    /// Gates the rule; a rule that returns `false` is skipped.
    fn valid_for(&self, builder: &UriBuilder) -> bool {
        let _ = builder;
        true
    }

    /// Lets a rule claim the first path segment of an authority-less URI
    /// as its host, changing how the remainder is interpreted.
    fn claim_host_from_path(&self, builder: &UriBuilder) -> bool {
        let _ = builder;
        false
    }

    /// Rewrites the detected authority text before it is split.
    fn normalize_authority(
        &self,
        authority: String,
        builder: &UriBuilder,
        config: &UriConfig,
    ) -> String {
        let _ = (builder, config);
        authority
    }

    /// Rewrites the detected host text before it is validated.
    fn normalize_host(&self, host: String, builder: &UriBuilder, config: &UriConfig) -> String {
        let _ = (builder, config);
        host
    }
}

/// A rule mutating the fully populated builder after parsing.
pub trait PostParseNormalizer: fmt::Debug + Send + Sync {
    /// Gates the rule; a rule that returns `false` is skipped.
    fn valid_for(&self, builder: &UriBuilder) -> bool {
        let _ = builder;
        true
    }

    /// Mutates the builder in place.
    fn normalize(&self, builder: &mut UriBuilder, config: &UriConfig) -> Result<(), UriError>;
}

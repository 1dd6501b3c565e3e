//! The immutable reference configuration.

use crate::{
    builder::UriBuilder,
    encoding::{Charset, HexCase},
    error::UriError,
    format::UriFormat,
    normalizer::{InParseNormalizer, PostParseNormalizer, PreParseNormalizer},
    parser::{Rfc3986Parser, UriParser},
    resolver::ReferenceResolver,
    rules,
    uri::Uri,
};
use std::sync::Arc;

/// The length cap applied when none is configured.
pub const DEFAULT_MAX_URL_LENGTH: usize = 65536;

/// The length cap of the first-generation archive tooling.
pub const LEGACY_MAX_URL_LENGTH: usize = 2083;

/// An immutable bundle of parsing strategy, reference resolver, normalizer
/// lists, rendering format and normalization toggles.
///
/// A config is built once (usually from a named preset), shared freely
/// across threads, and never mutated; cloning only bumps reference counts.
///
/// # Examples
///
/// ```
/// use surt_uri::UriConfig;
///
/// let config = UriConfig::surt_key().build();
/// let uri = config.parse("http://archive.org/goo/?b&a")?;
/// assert_eq!(uri.to_string(), "org,archive)/goo?a&b");
/// # Ok::<_, surt_uri::UriError>(())
/// ```
#[derive(Clone, Debug)]
pub struct UriConfig {
    parser: Arc<dyn UriParser>,
    resolver: ReferenceResolver,
    pre_normalizers: Arc<[Arc<dyn PreParseNormalizer>]>,
    in_parse_normalizers: Arc<[Arc<dyn InParseNormalizer>]>,
    post_normalizers: Arc<[Arc<dyn PostParseNormalizer>]>,
    default_format: UriFormat,
    require_absolute: bool,
    case_normalization: bool,
    percent_encoding_normalization: bool,
    percent_encoding_case: HexCase,
    normalize_segments: bool,
    scheme_based_normalization: bool,
    encode_illegal_characters: bool,
    punycode_unknown_scheme: bool,
    ipv4_normalization: bool,
    ipv6_normalization: bool,
    charset: Charset,
    max_url_length: usize,
}

impl UriConfig {
    /// Starts a builder with the strict defaults.
    pub fn builder() -> UriConfigBuilder {
        UriConfigBuilder::default()
    }

    /// RFC 3986 as written: no recovery, no inference; errors instead of
    /// fixes. Case, percent-encoding and dot-segment normalization stay
    /// on, as Section 6.2 blesses them.
    pub fn strict() -> UriConfigBuilder {
        UriConfigBuilder::default()
    }

    /// Tolerates the malformed input commonly found in archived links:
    /// whitespace trimming, slash collapsing, illegal-character escaping,
    /// optimistic `dns:` hosts.
    pub fn lax() -> UriConfigBuilder {
        UriConfigBuilder::default()
            .parser(Arc::new(Rfc3986Parser::lax()))
            .encode_illegal_characters(true)
            .punycode_unknown_scheme(true)
            .pre_normalizer(rules::TrimWhitespace)
            .pre_normalizer(rules::CollapseStartingSlashes)
            .pre_normalizer(rules::StripTrailingEscapedSpaces)
            .in_parse_normalizer(rules::OptimisticDnsScheme)
    }

    /// WHATWG-style recovery: scheme inference, loose IPv4 host forms,
    /// percent-decoded hosts, non-strict reference resolution.
    pub fn mimic_browser() -> UriConfigBuilder {
        UriConfigBuilder::default()
            .parser(Arc::new(Rfc3986Parser::mimic_browser()))
            .resolver(ReferenceResolver::new().strict_scheme(false))
            .encode_illegal_characters(true)
            .punycode_unknown_scheme(true)
            .pre_normalizer(rules::TrimWhitespace)
            .pre_normalizer(rules::CollapseStartingSlashes)
            .pre_normalizer(rules::InferScheme::default())
    }

    /// Byte-compatible with the first-generation archive tooling: lax
    /// recovery plus scheme inference, parse-time fragment stripping, the
    /// 2083-byte cap and fragment-less default rendering.
    pub fn legacy_archive() -> UriConfigBuilder {
        UriConfig::lax()
            .pre_normalizer(rules::InferScheme::default())
            .post_normalizer(rules::StripFragment)
            .max_url_length(LEGACY_MAX_URL_LENGTH)
            .default_format(UriFormat::usable())
    }

    /// Produces SURT index keys: the legacy-archive pipeline plus www and
    /// session-id stripping, trailing-slash removal and SURT rendering.
    pub fn surt_key() -> UriConfigBuilder {
        UriConfig::legacy_archive()
            .post_normalizer(rules::StripWwwPrefix)
            .post_normalizer(rules::StripSessionIds)
            .post_normalizer(rules::StripSessionIdPathParams)
            .post_normalizer(rules::StripTrailingSlash)
            .default_format(UriFormat::surt())
    }

    /// Produces keys byte-compatible with the older archive index format.
    pub fn legacy_surt_key() -> UriConfigBuilder {
        UriConfig::surt_key().default_format(UriFormat::legacy_surt())
    }

    /// Parses and normalizes `input` into a frozen [`Uri`].
    pub fn parse(&self, input: impl Into<String>) -> Result<Uri, UriError> {
        let mut builder = self.stage(input.into(), false)?;
        self.post_normalize(&mut builder)?;
        builder.build(self)
    }

    /// Resolves `reference` against `base` per RFC 3986 §5 and freezes the
    /// result. Both sides accept either a string or an already parsed
    /// [`Uri`].
    ///
    /// Post-parse normalization runs once, on the resolution target.
    pub fn resolve<B, R>(&self, base: &B, reference: &R) -> Result<Uri, UriError>
    where
        B: UriInput + ?Sized,
        R: UriInput + ?Sized,
    {
        let base = base.stage(self, false)?;
        let reference = reference.stage(self, true)?;
        let mut target = self.resolver.resolve(&base, &reference)?;
        self.post_normalize(&mut target)?;
        target.build(self)
    }

    /// Runs the pre-parse rules and the parser, yielding an un-frozen
    /// builder. Reference parsing skips the rules that only make sense
    /// for top-level input.
    pub(crate) fn stage(
        &self,
        mut input: String,
        as_reference: bool,
    ) -> Result<UriBuilder, UriError> {
        for rule in self.pre_normalizers.iter() {
            if (!as_reference || rule.applies_to_reference()) && rule.valid_for(&input) {
                input = rule.normalize(input, self)?;
            }
        }
        let mut builder = UriBuilder::new(self.charset);
        self.parser.parse(&mut builder, &input, self)?;
        Ok(builder)
    }

    fn post_normalize(&self, builder: &mut UriBuilder) -> Result<(), UriError> {
        for rule in self.post_normalizers.iter() {
            if rule.valid_for(builder) {
                rule.normalize(builder, self)?;
            }
        }
        Ok(())
    }

    pub fn resolver(&self) -> ReferenceResolver {
        self.resolver
    }

    pub fn in_parse_normalizers(&self) -> &[Arc<dyn InParseNormalizer>] {
        &self.in_parse_normalizers
    }

    pub fn default_format(&self) -> &UriFormat {
        &self.default_format
    }

    pub fn require_absolute(&self) -> bool {
        self.require_absolute
    }

    pub fn case_normalization(&self) -> bool {
        self.case_normalization
    }

    pub fn percent_encoding_normalization(&self) -> bool {
        self.percent_encoding_normalization
    }

    pub fn percent_encoding_case(&self) -> HexCase {
        self.percent_encoding_case
    }

    pub fn normalize_segments(&self) -> bool {
        self.normalize_segments
    }

    pub fn scheme_based_normalization(&self) -> bool {
        self.scheme_based_normalization
    }

    pub fn encode_illegal_characters(&self) -> bool {
        self.encode_illegal_characters
    }

    pub fn punycode_unknown_scheme(&self) -> bool {
        self.punycode_unknown_scheme
    }

    pub fn ipv4_normalization(&self) -> bool {
        self.ipv4_normalization
    }

    pub fn ipv6_normalization(&self) -> bool {
        self.ipv6_normalization
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn max_url_length(&self) -> usize {
        self.max_url_length
    }
}

/// Input acceptable to [`UriConfig::resolve`] on either side.
pub trait UriInput {
    /// Stages the input as a builder under `config`.
    fn stage(&self, config: &UriConfig, as_reference: bool) -> Result<UriBuilder, UriError>;
}

impl UriInput for str {
    fn stage(&self, config: &UriConfig, as_reference: bool) -> Result<UriBuilder, UriError> {
        config.stage(self.to_owned(), as_reference)
    }
}

impl UriInput for String {
    fn stage(&self, config: &UriConfig, as_reference: bool) -> Result<UriBuilder, UriError> {
        config.stage(self.clone(), as_reference)
    }
}

impl UriInput for Uri {
    fn stage(&self, _config: &UriConfig, _as_reference: bool) -> Result<UriBuilder, UriError> {
        Ok(self.to_builder())
    }
}

/// Builds a [`UriConfig`].
///
/// Every setter consumes and returns the builder; clone it to branch a
/// preset. [`build`](Self::build) prepends the early length check and
/// appends the final one, so they always bracket the rule lists.
#[derive(Clone, Debug)]
pub struct UriConfigBuilder {
    parser: Arc<dyn UriParser>,
    resolver: ReferenceResolver,
    pre_normalizers: Vec<Arc<dyn PreParseNormalizer>>,
    in_parse_normalizers: Vec<Arc<dyn InParseNormalizer>>,
    post_normalizers: Vec<Arc<dyn PostParseNormalizer>>,
    default_format: UriFormat,
    require_absolute: bool,
    case_normalization: bool,
    percent_encoding_normalization: bool,
    percent_encoding_case: HexCase,
    normalize_segments: bool,
    scheme_based_normalization: bool,
    encode_illegal_characters: bool,
    punycode_unknown_scheme: bool,
    ipv4_normalization: bool,
    ipv6_normalization: bool,
    charset: Charset,
    max_url_length: usize,
}

impl Default for UriConfigBuilder {
    fn default() -> Self {
        UriConfigBuilder {
            parser: Arc::new(Rfc3986Parser::strict()),
            resolver: ReferenceResolver::new(),
            pre_normalizers: Vec::new(),
            in_parse_normalizers: Vec::new(),
            post_normalizers: Vec::new(),
            default_format: UriFormat::plain(),
            require_absolute: false,
            case_normalization: true,
            percent_encoding_normalization: true,
            percent_encoding_case: HexCase::Upper,
            normalize_segments: true,
            scheme_based_normalization: true,
            encode_illegal_characters: false,
            punycode_unknown_scheme: false,
            ipv4_normalization: true,
            ipv6_normalization: true,
            charset: Charset::Utf8,
            max_url_length: DEFAULT_MAX_URL_LENGTH,
        }
    }
}

impl UriConfigBuilder {
    pub fn parser(mut self, parser: Arc<dyn UriParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn resolver(mut self, resolver: ReferenceResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Appends a pre-parse rule.
    pub fn pre_normalizer(mut self, rule: impl PreParseNormalizer + 'static) -> Self {
        self.pre_normalizers.push(Arc::new(rule));
        self
    }

    /// Appends an in-parse rule.
    pub fn in_parse_normalizer(mut self, rule: impl InParseNormalizer + 'static) -> Self {
        self.in_parse_normalizers.push(Arc::new(rule));
        self
    }

    /// Appends a post-parse rule.
    pub fn post_normalizer(mut self, rule: impl PostParseNormalizer + 'static) -> Self {
        self.post_normalizers.push(Arc::new(rule));
        self
    }

    pub fn default_format(mut self, format: UriFormat) -> Self {
        self.default_format = format;
        self
    }

    pub fn require_absolute(mut self, v: bool) -> Self {
        self.require_absolute = v;
        self
    }

    pub fn case_normalization(mut self, v: bool) -> Self {
        self.case_normalization = v;
        self
    }

    pub fn percent_encoding_normalization(mut self, v: bool) -> Self {
        self.percent_encoding_normalization = v;
        self
    }

    pub fn percent_encoding_case(mut self, v: HexCase) -> Self {
        self.percent_encoding_case = v;
        self
    }

    pub fn normalize_segments(mut self, v: bool) -> Self {
        self.normalize_segments = v;
        self
    }

    pub fn scheme_based_normalization(mut self, v: bool) -> Self {
        self.scheme_based_normalization = v;
        self
    }

    pub fn encode_illegal_characters(mut self, v: bool) -> Self {
        self.encode_illegal_characters = v;
        self
    }

    pub fn punycode_unknown_scheme(mut self, v: bool) -> Self {
        self.punycode_unknown_scheme = v;
        self
    }

    pub fn ipv4_normalization(mut self, v: bool) -> Self {
        self.ipv4_normalization = v;
        self
    }

    pub fn ipv6_normalization(mut self, v: bool) -> Self {
        self.ipv6_normalization = v;
        self
    }

    pub fn charset(mut self, v: Charset) -> Self {
        self.charset = v;
        self
    }

    pub fn max_url_length(mut self, v: usize) -> Self {
        self.max_url_length = v;
        self
    }

    /// Freezes the builder into a shareable [`UriConfig`].
    pub fn build(self) -> UriConfig {
        let mut pre = Vec::with_capacity(self.pre_normalizers.len() + 1);
        pre.push(Arc::new(rules::RejectOverlongInput) as Arc<dyn PreParseNormalizer>);
        pre.extend(self.pre_normalizers);

        let mut post = self.post_normalizers;
        post.push(Arc::new(rules::CheckLength) as Arc<dyn PostParseNormalizer>);

        UriConfig {
            parser: self.parser,
            resolver: self.resolver,
            pre_normalizers: pre.into(),
            in_parse_normalizers: self.in_parse_normalizers.into(),
            post_normalizers: post.into(),
            default_format: self.default_format,
            require_absolute: self.require_absolute,
            case_normalization: self.case_normalization,
            percent_encoding_normalization: self.percent_encoding_normalization,
            percent_encoding_case: self.percent_encoding_case,
            normalize_segments: self.normalize_segments,
            scheme_based_normalization: self.scheme_based_normalization,
            encode_illegal_characters: self.encode_illegal_characters,
            punycode_unknown_scheme: self.punycode_unknown_scheme,
            ipv4_normalization: self.ipv4_normalization,
            ipv6_normalization: self.ipv6_normalization,
            charset: self.charset,
            max_url_length: self.max_url_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configs_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<UriConfig>();
    }

    #[test]
    fn builder_is_persistent() {
        let base = UriConfig::lax();
        let strict_len = base.clone().max_url_length(10).build();
        let roomy = base.build();
        assert_eq!(strict_len.max_url_length(), 10);
        assert_eq!(roomy.max_url_length(), DEFAULT_MAX_URL_LENGTH);
    }

    #[test]
    fn require_absolute_is_enforced() {
        let config = UriConfig::strict().require_absolute(true).build();
        assert_eq!(config.parse("/only/a/path"), Err(UriError::NotAbsolute));
        assert!(config.parse("http://example.com/").is_ok());
    }
}

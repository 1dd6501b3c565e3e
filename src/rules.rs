//! The stock normalization rules wired into the named presets.

use crate::{
    builder::{HostKind, UriBuilder},
    config::UriConfig,
    encoding::table,
    error::UriError,
    normalizer::{InParseNormalizer, PostParseNormalizer, PreParseNormalizer},
    scheme,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

/// Characters trimmed from both ends of the raw input: C0 controls, space,
/// DEL and the Unicode line/paragraph separators that show up in scraped
/// markup.
fn is_trimmable(c: char) -> bool {
    c <= '\u{20}' || c == '\u{7f}' || c == '\u{85}' || c == '\u{2028}' || c == '\u{2029}'
}

/// Trims surrounding whitespace and control runs and removes embedded
/// tabs and line breaks.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrimWhitespace;

impl PreParseNormalizer for TrimWhitespace {
    fn normalize(&self, input: String, _config: &UriConfig) -> Result<String, UriError> {
        let trimmed = input.trim_matches(is_trimmable);
        let needs_inner = trimmed.contains(['\t', '\n', '\r']);
        if trimmed.len() == input.len() && !needs_inner {
            return Ok(input);
        }
        let out: String = trimmed.chars().filter(|c| !matches!(c, '\t' | '\n' | '\r')).collect();
        trace!(from = %input, to = %out, "trimmed whitespace");
        Ok(out)
    }
}

fn scheme_prefix(input: &str) -> Option<(&str, &str)> {
    let head_end = input.find(['/', '?', '#']).unwrap_or(input.len());
    let colon = input[..head_end].find(':')?;
    let candidate = &input[..colon];
    (!candidate.is_empty()
        && candidate.as_bytes()[0].is_ascii_alphabetic()
        && table::SCHEME.validate(candidate.as_bytes()))
    .then(|| (candidate, &input[colon + 1..]))
}

/// Collapses an erroneous run of three or more slashes after a slashed
/// scheme down to the two the grammar licenses.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollapseStartingSlashes;

impl PreParseNormalizer for CollapseStartingSlashes {
    fn normalize(&self, input: String, _config: &UriConfig) -> Result<String, UriError> {
        let Some((candidate, rest)) = scheme_prefix(&input) else {
            return Ok(input);
        };
        if !scheme::is_slashed(&candidate.to_ascii_lowercase()) {
            return Ok(input);
        }
        let slashes = rest.bytes().take_while(|&b| b == b'/').count();
        if slashes <= 2 {
            return Ok(input);
        }
        let out = format!("{candidate}://{}", &rest[slashes..]);
        trace!(from = %input, to = %out, "collapsed extra authority slashes");
        Ok(out)
    }
}

/// Strips a run of trailing escaped spaces (`%20`) from the end of the
/// authority segment, a common copy-paste artifact.
#[derive(Clone, Copy, Debug, Default)]
pub struct StripTrailingEscapedSpaces;

impl PreParseNormalizer for StripTrailingEscapedSpaces {
    fn valid_for(&self, input: &str) -> bool {
        input.contains("%20")
    }

    fn normalize(&self, input: String, _config: &UriConfig) -> Result<String, UriError> {
        let Some((_, rest)) = scheme_prefix(&input) else {
            return Ok(input);
        };
        let Some(auth) = rest.strip_prefix("//") else {
            return Ok(input);
        };
        let auth_start = input.len() - auth.len();
        let auth_end = auth_start
            + auth
                .find(['/', '?', '#'])
                .unwrap_or(auth.len());

        let mut end = auth_end;
        while input[auth_start..end].ends_with("%20") {
            end -= 3;
        }
        if end == auth_end {
            return Ok(input);
        }
        let out = format!("{}{}", &input[..end], &input[auth_end..]);
        trace!(from = %input, to = %out, "stripped trailing escaped spaces from authority");
        Ok(out)
    }
}

/// Prefixes a default scheme onto scheme-less input such as
/// `www.example.com/index.html` or `example.com:8080/`.
#[derive(Clone, Debug)]
pub struct InferScheme {
    scheme: String,
}

impl InferScheme {
    pub fn new(scheme: impl Into<String>) -> InferScheme {
        InferScheme {
            scheme: scheme.into(),
        }
    }
}

impl Default for InferScheme {
    fn default() -> Self {
        InferScheme::new("http")
    }
}

impl PreParseNormalizer for InferScheme {
    fn valid_for(&self, input: &str) -> bool {
        if input.is_empty() || (input.starts_with(['/', '?', '#']) && !input.starts_with("//")) {
            return false;
        }
        match scheme_prefix(input) {
            // A "scheme" that is unregistered and followed by digits is a
            // host:port pair, not a scheme.
            Some((candidate, rest)) => {
                scheme::well_known(&candidate.to_ascii_lowercase()).is_none()
                    && rest.bytes().next().is_some_and(|b| b.is_ascii_digit())
            }
            None => true,
        }
    }

    fn applies_to_reference(&self) -> bool {
        false
    }

    fn normalize(&self, input: String, _config: &UriConfig) -> Result<String, UriError> {
        let out = if let Some(rest) = input.strip_prefix("//") {
            format!("{}://{rest}", self.scheme)
        } else {
            format!("{}://{input}", self.scheme)
        };
        trace!(from = %input, to = %out, "inferred default scheme");
        Ok(out)
    }
}

/// Rejects input longer than the configured maximum before any work is
/// spent on it.
#[derive(Clone, Copy, Debug, Default)]
pub struct RejectOverlongInput;

impl PreParseNormalizer for RejectOverlongInput {
    fn normalize(&self, input: String, config: &UriConfig) -> Result<String, UriError> {
        if input.len() > config.max_url_length() {
            return Err(UriError::TooLong {
                len: input.len(),
                max: config.max_url_length(),
            });
        }
        Ok(input)
    }
}

/// Treats the opaque part of a `dns:` URI as its host, the optimistic
/// reading crawlers use for DNS records (`dns:example.com`).
#[derive(Clone, Copy, Debug, Default)]
pub struct OptimisticDnsScheme;

impl InParseNormalizer for OptimisticDnsScheme {
    fn valid_for(&self, builder: &UriBuilder) -> bool {
        builder.scheme().is_some_and(|s| s.eq_ignore_ascii_case("dns"))
    }

    fn claim_host_from_path(&self, builder: &UriBuilder) -> bool {
        !builder.has_authority()
    }
}

/// Drops the fragment at parse time, the way crawl frontiers store
/// fetchable URIs.
#[derive(Clone, Copy, Debug, Default)]
pub struct StripFragment;

impl PostParseNormalizer for StripFragment {
    fn valid_for(&self, builder: &UriBuilder) -> bool {
        builder.fragment().is_some()
    }

    fn normalize(&self, builder: &mut UriBuilder, _config: &UriConfig) -> Result<(), UriError> {
        builder.set_fragment(None);
        Ok(())
    }
}

static WWW_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^www\d*\.").unwrap());

/// Strips a `www` (or `www2`, `www13`, ...) prefix from registered-name
/// hosts, provided a dotted name remains.
#[derive(Clone, Copy, Debug, Default)]
pub struct StripWwwPrefix;

impl PostParseNormalizer for StripWwwPrefix {
    fn valid_for(&self, builder: &UriBuilder) -> bool {
        builder.host_kind() == Some(HostKind::RegName)
            && builder.scheme().is_some_and(scheme::is_slashed)
    }

    fn normalize(&self, builder: &mut UriBuilder, _config: &UriConfig) -> Result<(), UriError> {
        let Some(host) = builder.host() else {
            return Ok(());
        };
        if let Some(m) = WWW_PREFIX.find(host) {
            let stripped = &host[m.end()..];
            if stripped.contains('.') {
                trace!(from = %host, to = %stripped, "stripped www prefix");
                let stripped = stripped.to_owned();
                builder.set_host(Some(stripped), Some(HostKind::RegName));
            }
        }
        Ok(())
    }
}

static SESSION_ID_TOKENS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^jsessionid=[0-9a-z]{32}$",
        r"(?i)^phpsessid=[0-9a-z]{32}$",
        r"(?i)^sid=[0-9a-z]{32}$",
        r"(?i)^aspsessionid[a-z]{8}=[a-z0-9]{16,32}$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static CFID_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^cfid=[0-9]+$").unwrap());
static CFTOKEN_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^cftoken=[0-9a-z-]+$").unwrap());

/// Removes known session-id query parameters, keeping every other token
/// and the `&` structure between them intact.
///
/// The ColdFusion pair is only removed when both `CFID` and `CFTOKEN` are
/// present.
#[derive(Clone, Copy, Debug, Default)]
pub struct StripSessionIds;

impl PostParseNormalizer for StripSessionIds {
    fn valid_for(&self, builder: &UriBuilder) -> bool {
        builder.query().is_some()
    }

    fn normalize(&self, builder: &mut UriBuilder, _config: &UriConfig) -> Result<(), UriError> {
        let Some(query) = builder.query() else {
            return Ok(());
        };
        let tokens: Vec<&str> = query.split('&').collect();
        let drop_cf = tokens.iter().any(|t| CFID_TOKEN.is_match(t))
            && tokens.iter().any(|t| CFTOKEN_TOKEN.is_match(t));

        let kept: Vec<&str> = tokens
            .iter()
            .copied()
            .filter(|t| {
                if SESSION_ID_TOKENS.iter().any(|re| re.is_match(t)) {
                    return false;
                }
                if drop_cf && (CFID_TOKEN.is_match(t) || CFTOKEN_TOKEN.is_match(t)) {
                    return false;
                }
                true
            })
            .collect();

        if kept.len() == tokens.len() {
            return Ok(());
        }
        trace!(from = %query, "stripped session-id query parameters");
        let new_query = (!kept.is_empty()).then(|| kept.join("&"));
        builder.set_query(new_query);
        Ok(())
    }
}

static PATH_SESSION_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i);jsessionid=[0-9a-z]{32}$").unwrap());

/// Removes a `;jsessionid=` path parameter from the end of the path.
#[derive(Clone, Copy, Debug, Default)]
pub struct StripSessionIdPathParams;

impl PostParseNormalizer for StripSessionIdPathParams {
    fn valid_for(&self, builder: &UriBuilder) -> bool {
        builder.path().contains(";jsessionid=") || builder.path().contains(";JSESSIONID=")
    }

    fn normalize(&self, builder: &mut UriBuilder, _config: &UriConfig) -> Result<(), UriError> {
        if let Some(m) = PATH_SESSION_ID.find(builder.path()) {
            let path = builder.path()[..m.start()].to_owned();
            trace!(to = %path, "stripped jsessionid path parameter");
            builder.set_path(path);
        }
        Ok(())
    }
}

/// Strips a single trailing slash from a non-root path, so `/goo/` and
/// `/goo` collapse to the same key. The root path `/` is preserved.
#[derive(Clone, Copy, Debug, Default)]
pub struct StripTrailingSlash;

impl PostParseNormalizer for StripTrailingSlash {
    fn valid_for(&self, builder: &UriBuilder) -> bool {
        builder.path().len() > 1 && builder.path().ends_with('/')
    }

    fn normalize(&self, builder: &mut UriBuilder, _config: &UriConfig) -> Result<(), UriError> {
        let mut path = builder.path().to_owned();
        path.pop();
        builder.set_path(path);
        Ok(())
    }
}

/// Re-checks the overall length after all other rules have run, since
/// escaping may have grown the URI past the configured maximum.
#[derive(Clone, Copy, Debug, Default)]
pub struct CheckLength;

impl PostParseNormalizer for CheckLength {
    fn normalize(&self, builder: &mut UriBuilder, config: &UriConfig) -> Result<(), UriError> {
        let len = builder.assemble().len();
        if len > config.max_url_length() {
            return Err(UriError::TooLong {
                len,
                max: config.max_url_length(),
            });
        }
        Ok(())
    }
}

//! The immutable URI value.

use crate::{
    builder::{HostKind, UriBuilder},
    encoding::{self, Charset},
    format::UriFormat,
    query::ParsedQuery,
    scheme,
};
use core::{fmt, hash};
use once_cell::sync::OnceCell;

/// A parsed, normalized, immutable URI reference.
///
/// A `Uri` is produced only by freezing a [`UriBuilder`] and never mutated
/// afterward, which makes it cheap to share across threads. Rendering goes
/// through the configuration's default [`UriFormat`] (via
/// [`Display`](fmt::Display)) or any custom format via
/// [`to_custom_string`](Self::to_custom_string).
///
/// # Examples
///
/// ```
/// use surt_uri::UriConfig;
///
/// let config = UriConfig::lax().build();
/// let uri = config.parse("HTTP://www.Example.COM:80/a/../b?x=1")?;
/// assert_eq!(uri.to_string(), "http://www.example.com/b?x=1");
/// assert_eq!(uri.host(), Some("www.example.com"));
/// assert_eq!(uri.port(), None);
/// assert_eq!(uri.decoded_port(), Some(80));
/// # Ok::<_, surt_uri::UriError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Uri {
    scheme: Option<String>,
    user: Option<String>,
    password: Option<String>,
    host: Option<String>,
    host_kind: Option<HostKind>,
    port: Option<u32>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
    charset: Charset,
    default_format: UriFormat,
    parsed_query: OnceCell<ParsedQuery>,
}

impl Uri {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        scheme: Option<String>,
        user: Option<String>,
        password: Option<String>,
        host: Option<String>,
        host_kind: Option<HostKind>,
        port: Option<u32>,
        path: String,
        query: Option<String>,
        fragment: Option<String>,
        charset: Charset,
        default_format: UriFormat,
    ) -> Uri {
        Uri {
            scheme,
            user,
            password,
            host,
            host_kind,
            port,
            path,
            query,
            fragment,
            charset,
            default_format,
            parsed_query: OnceCell::new(),
        }
    }

    /// The scheme, lower-cased under case normalization.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// The user part of the userinfo.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// The password part of the userinfo.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// The raw host: a percent-encoded registered name, a dotted-decimal
    /// IPv4 literal, or a bracket-free IPv6 literal.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// The host with percent-escapes decoded and punycode labels converted
    /// back to Unicode.
    pub fn decoded_host(&self) -> Option<String> {
        let host = self.host.as_deref()?;
        if self.host_kind != Some(HostKind::RegName) {
            return Some(host.to_owned());
        }
        let decoded = encoding::percent_decode(host, self.charset);
        if decoded.split('.').any(|label| label.starts_with("xn--")) {
            let (unicode, result) = idna::domain_to_unicode(&decoded);
            if result.is_ok() {
                return Some(unicode);
            }
        }
        Some(decoded)
    }

    /// The explicit port. Under scheme-based normalization this is absent
    /// when it equals the scheme's default.
    pub fn port(&self) -> Option<u32> {
        self.port
    }

    /// The effective port: the explicit one, or the scheme's default.
    pub fn decoded_port(&self) -> Option<u32> {
        self.port
            .or_else(|| self.scheme().and_then(scheme::default_port).map(u32::from))
    }

    /// The raw path; never absent, possibly empty.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The path with percent-escapes decoded in the configured charset.
    pub fn decoded_path(&self) -> String {
        encoding::percent_decode(&self.path, self.charset)
    }

    /// The raw, undecoded query.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// The canonical sorted query model, computed on first access.
    ///
    /// The cache write is idempotent, so concurrent first accesses are
    /// safe without locking out readers.
    pub fn parsed_query(&self) -> &ParsedQuery {
        self.parsed_query
            .get_or_init(|| ParsedQuery::parse(self.query.as_deref().unwrap_or("")))
    }

    /// The fragment.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Returns `true` if the URI has a scheme.
    pub fn is_absolute(&self) -> bool {
        self.scheme.is_some()
    }

    /// Returns `true` if the host is a dotted-decimal IPv4 literal.
    pub fn is_ipv4(&self) -> bool {
        self.host_kind == Some(HostKind::Ipv4)
    }

    /// Returns `true` if the host is an IPv6 literal.
    pub fn is_ipv6(&self) -> bool {
        self.host_kind == Some(HostKind::Ipv6)
    }

    /// Returns `true` if the host is a registered name.
    pub fn is_registered_name(&self) -> bool {
        self.host_kind == Some(HostKind::RegName)
    }

    /// Returns `true` if the path begins with `/`.
    pub fn is_abs_path(&self) -> bool {
        self.path.starts_with('/')
    }

    /// The charset used when percent-decoding components.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub(crate) fn host_kind(&self) -> Option<HostKind> {
        self.host_kind
    }

    /// Renders the URI with a custom format.
    pub fn to_custom_string(&self, format: &UriFormat) -> String {
        let mut buf = String::new();
        format.write(self, &mut buf);
        buf
    }

    /// Re-stages the frozen value as a builder, for resolution.
    pub(crate) fn to_builder(&self) -> UriBuilder {
        let mut b = UriBuilder::new(self.charset);
        b.set_scheme(self.scheme.clone());
        b.set_host(self.host.clone(), self.host_kind);
        b.set_user(self.user.clone());
        b.set_password(self.password.clone());
        b.set_port(self.port);
        b.set_path(self.path.clone());
        b.set_query(self.query.clone());
        b.set_fragment(self.fragment.clone());
        b
    }

    fn parts(&self) -> impl Eq + hash::Hash + '_ {
        (
            self.scheme.as_deref(),
            self.user.as_deref(),
            self.password.as_deref(),
            self.host.as_deref(),
            self.port,
            self.path.as_str(),
            self.query.as_deref(),
            self.fragment.as_deref(),
        )
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_custom_string(&self.default_format))
    }
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.parts() == other.parts()
    }
}

impl Eq for Uri {}

impl hash::Hash for Uri {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.parts().hash(state);
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Uri {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Uri {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Uri, D::Error> {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        crate::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use crate::UriConfig;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn calculate_hash<T: Hash>(t: &T) -> u64 {
        let mut s = DefaultHasher::new();
        t.hash(&mut s);
        s.finish()
    }

    #[test]
    fn compares_uri() {
        let config = UriConfig::strict().build();
        let u = config.parse("http://127.0.0.1:8081/").unwrap();
        let v = config.parse("http://127.0.0.1:8082/").unwrap();
        assert_eq!(u, u.clone());
        assert_ne!(u, v);
    }

    #[test]
    fn hashes_uri() {
        let config = UriConfig::strict().build();
        let u = config.parse("http://127.0.0.1:8081/").unwrap();
        let v = config.parse("http://127.0.0.1:8082/").unwrap();
        assert_eq!(calculate_hash(&u), calculate_hash(&u.clone()));
        assert_ne!(calculate_hash(&u), calculate_hash(&v));
    }

    #[test]
    fn query_cache_is_stable() {
        let config = UriConfig::lax().build();
        let u = config.parse("http://example.com/?b=2&a=1").unwrap();
        let first = u.parsed_query().to_string();
        assert_eq!(first, "a=1&b=2");
        assert_eq!(u.parsed_query().to_string(), first);
    }
}

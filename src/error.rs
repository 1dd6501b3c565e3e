//! Error types.

use core::fmt;
use thiserror::Error;

/// The component a parse error is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Component {
    Scheme,
    Userinfo,
    Host,
    Port,
    Path,
    Query,
    Fragment,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Scheme => "scheme",
            Component::Userinfo => "userinfo",
            Component::Host => "host",
            Component::Port => "port",
            Component::Path => "path",
            Component::Query => "query",
            Component::Fragment => "fragment",
        };
        f.write_str(name)
    }
}

/// Detailed cause of a [`MalformedAuthority`] error.
///
/// [`MalformedAuthority`]: UriError::MalformedAuthority
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AuthorityError {
    /// An IP literal opened with `[` but never closed.
    #[error("unterminated IP literal")]
    UnterminatedIpLiteral,
    /// A bracketed literal that is not a well-formed IPv6 address.
    #[error("invalid IPv6 literal")]
    InvalidIpv6Addr,
    /// A host that consists of digits and dots but is not a valid
    /// dotted-decimal IPv4 address.
    #[error("invalid IPv4 address")]
    InvalidIpv4Addr,
    /// A port containing non-digit characters.
    #[error("non-numeric port")]
    InvalidPort,
    /// A numeric port greater than 65535.
    #[error("port out of range")]
    PortOutOfRange,
    /// A registered name with an empty label, such as `a..b`.
    #[error("empty host label")]
    EmptyHostLabel,
    /// A percent-encoded registered name, rejected by the lax parser.
    #[error("percent-encoded registered name")]
    EncodedRegName,
    /// An internationalized hostname that failed punycode conversion.
    #[error("invalid internationalized hostname")]
    InvalidIdn,
}

/// An error produced while parsing, normalizing or resolving a URI.
///
/// A parse either fully succeeds and yields an invariant-satisfying [`Uri`],
/// or fails with one of these; there is no partial-success state.
///
/// [`Uri`]: crate::Uri
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum UriError {
    /// The configuration requires an absolute URI and the input has no scheme.
    #[error("uri is not absolute")]
    NotAbsolute,
    /// A character violates its component's grammar and illegal-character
    /// escaping is disabled.
    #[error("illegal character in {component} at index {index}")]
    IllegalCharacter {
        /// The component in which the character was found.
        component: Component,
        /// Byte index of the character within the component.
        index: usize,
    },
    /// The authority could not be interpreted as userinfo, host and port.
    #[error("malformed authority: {0}")]
    MalformedAuthority(#[from] AuthorityError),
    /// The URI exceeds the configured maximum length.
    #[error("uri is {len} bytes long, exceeding the maximum of {max}")]
    TooLong {
        /// Length of the offending URI.
        len: usize,
        /// The configured maximum.
        max: usize,
    },
    /// Dot-segment removal attempted to ascend above the path root.
    #[error("reference resolution ascended above the path root")]
    UnresolvableReference,
}

impl UriError {
    pub(crate) fn illegal(component: Component, index: usize) -> UriError {
        UriError::IllegalCharacter { component, index }
    }
}

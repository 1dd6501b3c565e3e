//! The mutable staging object driven by the parser, the reference resolver
//! and the normalizers.

use crate::{config::UriConfig, encoding::Charset, error::UriError, scheme, uri::Uri};

/// Classification of a present host.
///
/// Exactly one kind applies to any parsed host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostKind {
    /// A registered name (neither an IPv4 nor an IPv6 literal).
    RegName,
    /// A dotted-decimal IPv4 literal.
    Ipv4,
    /// An IPv6 literal, stored without brackets.
    Ipv6,
}

/// Mutable staging state for a single parse, resolve or build operation.
///
/// A builder is owned by exactly one call chain and discarded after
/// [`build`](Self::build) freezes it into a [`Uri`]. It is not meant to be
/// shared between threads.
#[derive(Clone, Debug, Default)]
pub struct UriBuilder {
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
}

impl UriBuilder {
    /// Creates an empty builder decoding percent-escapes in `charset`.
    pub fn new(charset: Charset) -> UriBuilder {
        UriBuilder {
            charset,
            ..UriBuilder::default()
        }
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn host_kind(&self) -> Option<HostKind> {
        self.host_kind
    }

    pub fn port(&self) -> Option<u32> {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Returns `true` if the path begins with `/`.
    pub fn is_abs_path(&self) -> bool {
        self.path.starts_with('/')
    }

    /// Returns `true` if an authority (possibly with an empty host) is set.
    pub fn has_authority(&self) -> bool {
        self.host.is_some()
    }

    pub fn set_scheme(&mut self, scheme: Option<String>) {
        self.scheme = scheme;
    }

    pub fn set_user(&mut self, user: Option<String>) {
        self.user = user;
    }

    pub fn set_password(&mut self, password: Option<String>) {
        self.password = password;
    }

    /// Sets the host along with its classification; `None` clears the
    /// entire authority.
    pub fn set_host(&mut self, host: Option<String>, kind: Option<HostKind>) {
        debug_assert_eq!(host.is_some(), kind.is_some());
        self.host = host;
        self.host_kind = kind;
        if self.host.is_none() {
            self.user = None;
            self.password = None;
            self.port = None;
        }
    }

    pub fn set_port(&mut self, port: Option<u32>) {
        self.port = port;
    }

    pub fn set_path(&mut self, path: String) {
        self.path = path;
    }

    pub fn set_query(&mut self, query: Option<String>) {
        self.query = query;
    }

    pub fn set_fragment(&mut self, fragment: Option<String>) {
        self.fragment = fragment;
    }

    /// Copies the authority subcomponents of `other` into this builder.
    pub(crate) fn adopt_authority(&mut self, other: &UriBuilder) {
        self.user = other.user.clone();
        self.password = other.password.clone();
        self.host = other.host.clone();
        self.host_kind = other.host_kind;
        self.port = other.port;
    }

    /// Assembles the staged components into a raw URI reference string.
    ///
    /// This is the form the post-normalization length check runs against;
    /// no format flags apply.
    pub fn assemble(&self) -> String {
        let mut buf = String::new();
        if let Some(scheme) = &self.scheme {
            buf.push_str(scheme);
            buf.push(':');
        }
        if let Some(host) = &self.host {
            buf.push_str("//");
            if let Some(user) = &self.user {
                buf.push_str(user);
                if let Some(password) = &self.password {
                    buf.push(':');
                    buf.push_str(password);
                }
                buf.push('@');
            }
            if self.host_kind == Some(HostKind::Ipv6) {
                buf.push('[');
                buf.push_str(host);
                buf.push(']');
            } else {
                buf.push_str(host);
            }
            if let Some(port) = self.port {
                buf.push(':');
                buf.push_str(&port.to_string());
            }
        }
        buf.push_str(&self.path);
        if let Some(query) = &self.query {
            buf.push('?');
            buf.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            buf.push('#');
            buf.push_str(fragment);
        }
        buf
    }

    /// Freezes the builder into an immutable [`Uri`].
    ///
    /// Scheme-based normalization is applied here so that parsing and
    /// reference resolution converge on the same canonical form: a port
    /// equal to the scheme's default is elided and an empty path on an
    /// authority-bearing URI becomes `/`.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::NotAbsolute`] if the configuration requires an
    /// absolute URI and no scheme is staged.
    pub fn build(mut self, config: &UriConfig) -> Result<Uri, UriError> {
        if config.require_absolute() && self.scheme.is_none() {
            return Err(UriError::NotAbsolute);
        }
        if config.scheme_based_normalization() {
            if let (Some(s), Some(port)) = (self.scheme.as_deref(), self.port) {
                if scheme::default_port(s).map(u32::from) == Some(port) {
                    self.port = None;
                }
            }
            if self.host.is_some() && self.path.is_empty() {
                self.path.push('/');
            }
        }
        Ok(Uri::from_parts(
            self.scheme,
            self.user,
            self.password,
            self.host,
            self.host_kind,
            self.port,
            self.path,
            self.query,
            self.fragment,
            self.charset,
            config.default_format().clone(),
        ))
    }
}

//! Serialization strategies for frozen URIs.

use crate::{surt::SurtEncoder, uri::Uri};
use std::sync::Arc;

/// An immutable record of per-component rendering decisions.
///
/// A format either omits a component, renders it raw, or renders it
/// decoded; an optional [`SurtEncoder`] takes over the authority for
/// index-key rendering. Every `with_*` setter returns a new value.
#[derive(Clone, Debug, Default)]
pub struct UriFormat {
    ignore_scheme: bool,
    ignore_user: bool,
    ignore_password: bool,
    ignore_host: bool,
    ignore_port: bool,
    ignore_path: bool,
    ignore_query: bool,
    ignore_fragment: bool,
    decode_host: bool,
    decode_path: bool,
    sort_query: bool,
    lowercase: bool,
    surt_encoder: Option<Arc<dyn SurtEncoder>>,
}

impl UriFormat {
    /// Renders every component raw; the identity format.
    pub fn plain() -> UriFormat {
        UriFormat::default()
    }

    /// The fetchable form consumed by crawl logs: everything except the
    /// fragment.
    pub fn usable() -> UriFormat {
        UriFormat::plain().with_ignore_fragment(true)
    }

    /// The deduplication form: credentials and fragment stripped.
    pub fn canonical() -> UriFormat {
        UriFormat::usable()
            .with_ignore_user(true)
            .with_ignore_password(true)
    }

    /// The SURT index-key form: scheme, credentials and fragment ignored,
    /// host decoded and reversed, query canonically sorted.
    pub fn surt() -> UriFormat {
        UriFormat::canonical()
            .with_ignore_scheme(true)
            .with_decode_host(true)
            .with_sort_query(true)
            .with_surt_encoder(Arc::new(crate::surt::DefaultSurtEncoder))
    }

    /// The byte-compatible key form of the older archive generation:
    /// like [`surt`](Self::surt) but with no host decoding and the whole
    /// key lower-cased.
    pub fn legacy_surt() -> UriFormat {
        UriFormat::canonical()
            .with_ignore_scheme(true)
            .with_sort_query(true)
            .with_lowercase(true)
            .with_surt_encoder(Arc::new(crate::surt::LegacySurtEncoder))
    }

    pub fn with_ignore_scheme(mut self, v: bool) -> UriFormat {
        self.ignore_scheme = v;
        self
    }

    pub fn with_ignore_user(mut self, v: bool) -> UriFormat {
        self.ignore_user = v;
        self
    }

    pub fn with_ignore_password(mut self, v: bool) -> UriFormat {
        self.ignore_password = v;
        self
    }

    pub fn with_ignore_host(mut self, v: bool) -> UriFormat {
        self.ignore_host = v;
        self
    }

    pub fn with_ignore_port(mut self, v: bool) -> UriFormat {
        self.ignore_port = v;
        self
    }

    pub fn with_ignore_path(mut self, v: bool) -> UriFormat {
        self.ignore_path = v;
        self
    }

    pub fn with_ignore_query(mut self, v: bool) -> UriFormat {
        self.ignore_query = v;
        self
    }

    pub fn with_ignore_fragment(mut self, v: bool) -> UriFormat {
        self.ignore_fragment = v;
        self
    }

    pub fn with_decode_host(mut self, v: bool) -> UriFormat {
        self.decode_host = v;
        self
    }

    pub fn with_decode_path(mut self, v: bool) -> UriFormat {
        self.decode_path = v;
        self
    }

    pub fn with_sort_query(mut self, v: bool) -> UriFormat {
        self.sort_query = v;
        self
    }

    pub fn with_lowercase(mut self, v: bool) -> UriFormat {
        self.lowercase = v;
        self
    }

    pub fn with_surt_encoder(mut self, encoder: Arc<dyn SurtEncoder>) -> UriFormat {
        self.surt_encoder = Some(encoder);
        self
    }

    pub fn ignore_user(&self) -> bool {
        self.ignore_user
    }

    pub fn ignore_password(&self) -> bool {
        self.ignore_password
    }

    pub fn ignore_port(&self) -> bool {
        self.ignore_port
    }

    pub fn decode_host(&self) -> bool {
        self.decode_host
    }

    /// Renders `uri` according to this format.
    pub(crate) fn write(&self, uri: &Uri, buf: &mut String) {
        let render_auth = uri.host().is_some() && !self.ignore_host;
        let render_scheme = uri.scheme().is_some() && !self.ignore_scheme;

        if render_scheme {
            buf.push_str(uri.scheme().unwrap());
            buf.push(':');
            if render_auth {
                buf.push_str("//");
            }
        } else if render_auth && self.surt_encoder.is_none() && uri.scheme().is_none() {
            // A network-path reference keeps its leading slashes.
            buf.push_str("//");
        }

        if render_auth {
            match &self.surt_encoder {
                Some(encoder) => {
                    if render_scheme {
                        buf.push('(');
                    }
                    encoder.write_authority(uri, self, buf);
                }
                None => self.write_plain_authority(uri, buf),
            }
        }

        if !self.ignore_path {
            if self.decode_path {
                buf.push_str(&uri.decoded_path());
            } else {
                buf.push_str(uri.path());
            }
        }

        if !self.ignore_query {
            if let Some(query) = uri.query() {
                buf.push('?');
                if self.sort_query {
                    buf.push_str(&uri.parsed_query().to_string());
                } else {
                    buf.push_str(query);
                }
            }
        }

        if !self.ignore_fragment {
            if let Some(fragment) = uri.fragment() {
                buf.push('#');
                buf.push_str(fragment);
            }
        }

        if self.lowercase {
            buf.make_ascii_lowercase();
        }
    }

    fn write_plain_authority(&self, uri: &Uri, buf: &mut String) {
        if let Some(user) = uri.user().filter(|_| !self.ignore_user) {
            buf.push_str(user);
            if let Some(password) = uri.password().filter(|_| !self.ignore_password) {
                buf.push(':');
                buf.push_str(password);
            }
            buf.push('@');
        }

        let host = if self.decode_host {
            uri.decoded_host().unwrap_or_default()
        } else {
            uri.host().unwrap_or_default().to_owned()
        };
        if uri.is_ipv6() {
            buf.push('[');
            buf.push_str(&host);
            buf.push(']');
        } else {
            buf.push_str(&host);
        }

        if let Some(port) = uri.port().filter(|_| !self.ignore_port) {
            buf.push(':');
            buf.push_str(&port.to_string());
        }
    }
}

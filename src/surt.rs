//! Sort-friendly URI Reordering Transform encoders.
//!
//! A SURT key reverses the DNS labels of the host so that URIs from the
//! same site sort contiguously in an archive index:
//! `example.com` becomes `com,example`.

use crate::{builder::HostKind, format::UriFormat, uri::Uri};
use core::fmt;

/// Renders the authority of a URI for index-key use.
///
/// Encoders are stateless; the [`UriFormat`] carries all the decisions.
pub trait SurtEncoder: fmt::Debug + Send + Sync {
    /// Writes the authority (host, then `:port`, then `@userinfo`, closed
    /// with `)`) onto `buf`.
    fn write_authority(&self, uri: &Uri, format: &UriFormat, buf: &mut String);
}

fn write_reversed_host(host: &str, buf: &mut String) {
    let mut first = true;
    for label in host.split('.').rev() {
        if !first {
            buf.push(',');
        }
        first = false;
        buf.push_str(label);
    }
}

fn write_tail(uri: &Uri, format: &UriFormat, buf: &mut String) {
    if let Some(port) = uri.port().filter(|_| !format.ignore_port()) {
        buf.push(':');
        buf.push_str(&port.to_string());
    }
    if let Some(user) = uri.user().filter(|_| !format.ignore_user()) {
        buf.push('@');
        buf.push_str(user);
        if let Some(password) = uri.password().filter(|_| !format.ignore_password()) {
            buf.push(':');
            buf.push_str(password);
        }
    }
    buf.push(')');
}

/// The standard SURT encoder: reversed comma-joined labels for registered
/// names, IP hosts kept as-is, host decoded when the format says so.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultSurtEncoder;

impl SurtEncoder for DefaultSurtEncoder {
    fn write_authority(&self, uri: &Uri, format: &UriFormat, buf: &mut String) {
        let host = if format.decode_host() {
            uri.decoded_host().unwrap_or_default()
        } else {
            uri.host().unwrap_or_default().to_owned()
        };
        match uri.host_kind() {
            Some(HostKind::RegName) => write_reversed_host(&host, buf),
            Some(HostKind::Ipv6) => {
                buf.push('[');
                buf.push_str(&host);
                buf.push(']');
            }
            _ => buf.push_str(&host),
        }
        write_tail(uri, format, buf);
    }
}

/// The first-generation archive key encoder, kept byte-for-byte
/// compatible: never decodes the host and always lower-cases it.
#[derive(Clone, Copy, Debug, Default)]
pub struct LegacySurtEncoder;

impl SurtEncoder for LegacySurtEncoder {
    fn write_authority(&self, uri: &Uri, format: &UriFormat, buf: &mut String) {
        let host = uri.host().unwrap_or_default().to_ascii_lowercase();
        match uri.host_kind() {
            Some(HostKind::RegName) => write_reversed_host(&host, buf),
            Some(HostKind::Ipv6) => {
                buf.push('[');
                buf.push_str(&host);
                buf.push(']');
            }
            _ => buf.push_str(&host),
        }
        write_tail(uri, format, buf);
    }
}

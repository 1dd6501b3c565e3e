//! The RFC 3986 grammar parser.
//!
//! Components are parsed strictly in order: scheme, authority (userinfo,
//! host, port), path, query, fragment. Each component is delimited by its
//! terminator, validated against its character-class table and
//! percent-normalized in a single pass.

use crate::{
    builder::{HostKind, UriBuilder},
    config::UriConfig,
    encoding::{self, decode_octet, push_pct_encoded, table, table::Table},
    error::{AuthorityError, Component, UriError},
    ip, resolver, scheme,
};
use core::fmt;
use tracing::trace;

type Result<T> = core::result::Result<T, UriError>;

/// A parsing strategy driving a [`UriBuilder`].
///
/// Implementations are stateless and shareable; all per-parse state lives
/// in the builder and on the stack.
pub trait UriParser: fmt::Debug + Send + Sync {
    /// Parses `input` into `builder`, consuming the whole string.
    fn parse(&self, builder: &mut UriBuilder, input: &str, config: &UriConfig) -> Result<()>;
}

/// Recovery posture of the [`Rfc3986Parser`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParserFlavor {
    /// Accept only what the RFC grammar licenses; raise instead of fixing.
    Strict,
    /// Tolerate the malformed input commonly seen in archived links:
    /// collapse redundant authority slashes, trim stray host dots, but
    /// reject percent-encoded registered names.
    Lax,
    /// WHATWG-style recovery: decode percent-encoded hosts, accept loose
    /// numeric IPv4 forms, split userinfo at the last `@`, escape what
    /// cannot be repaired.
    MimicBrowser,
}

/// The hand-written RFC 3986 parser, in one of three flavors.
#[derive(Clone, Copy, Debug)]
pub struct Rfc3986Parser {
    flavor: ParserFlavor,
}

impl Rfc3986Parser {
    pub fn new(flavor: ParserFlavor) -> Rfc3986Parser {
        Rfc3986Parser { flavor }
    }

    pub fn strict() -> Rfc3986Parser {
        Rfc3986Parser::new(ParserFlavor::Strict)
    }

    pub fn lax() -> Rfc3986Parser {
        Rfc3986Parser::new(ParserFlavor::Lax)
    }

    pub fn mimic_browser() -> Rfc3986Parser {
        Rfc3986Parser::new(ParserFlavor::MimicBrowser)
    }

    pub fn flavor(&self) -> ParserFlavor {
        self.flavor
    }
}

impl UriParser for Rfc3986Parser {
    fn parse(&self, builder: &mut UriBuilder, input: &str, config: &UriConfig) -> Result<()> {
        let mut walk = Walk {
            flavor: self.flavor,
            bytes: input.as_bytes(),
            input,
            pos: 0,
            builder,
            config,
        };
        walk.run()
    }
}

/// One parse pass over one input.
///
/// # Invariants
///
/// `pos <= bytes.len()`, `pos` is non-decreasing and always on a UTF-8
/// code point boundary.
struct Walk<'a> {
    flavor: ParserFlavor,
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    builder: &'a mut UriBuilder,
    config: &'a UriConfig,
}

impl Walk<'_> {
    fn run(&mut self) -> Result<()> {
        let had_scheme = self.parse_scheme()?;

        if self.read_authority_intro() {
            self.parse_authority()?;
        } else if self.claim_host_from_path() {
            self.parse_host_only()?;
        }

        self.parse_path(had_scheme)?;
        self.parse_query()?;
        self.parse_fragment()?;

        debug_assert_eq!(self.pos, self.bytes.len());
        Ok(())
    }

    fn remaining(&self) -> &str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Scans for the component terminator, returning the component slice
    /// and leaving the position on the terminator.
    fn take_until(&mut self, terminators: &[u8]) -> &'_ str {
        let start = self.pos;
        let end = self.bytes[start..]
            .iter()
            .position(|b| terminators.contains(b))
            .map_or(self.bytes.len(), |i| start + i);
        self.pos = end;
        &self.input[start..end]
    }

    /// Parses an optional scheme; returns `true` if one was found.
    fn parse_scheme(&mut self) -> Result<bool> {
        let mut end = None;
        for (i, &b) in self.bytes.iter().enumerate() {
            if b == b':' {
                end = Some(i);
                break;
            }
            if matches!(b, b'/' | b'?' | b'#') {
                break;
            }
        }
        let Some(end) = end else { return Ok(false) };

        let candidate = &self.input[..end];
        let valid = !candidate.is_empty()
            && candidate.as_bytes()[0].is_ascii_alphabetic()
            && table::SCHEME.validate(candidate.as_bytes());
        if !valid {
            // In a scheme-less reference the first path segment cannot
            // contain a colon; only the strict flavor refuses outright.
            return if self.flavor == ParserFlavor::Strict {
                Err(UriError::illegal(Component::Scheme, 0))
            } else {
                trace!(input = %self.input, "treating colon-bearing input as relative path");
                Ok(false)
            };
        }

        let mut scheme = candidate.to_owned();
        if self.config.case_normalization() {
            scheme.make_ascii_lowercase();
        }
        self.builder.set_scheme(Some(scheme));
        self.pos = end + 1;
        Ok(true)
    }

    /// Consumes the `//` introducing an authority. The lax and browser
    /// flavors accept any positive run of slashes after a slashed scheme.
    fn read_authority_intro(&mut self) -> bool {
        let slashes = self.bytes[self.pos..]
            .iter()
            .take_while(|&&b| b == b'/')
            .count();

        if self.flavor != ParserFlavor::Strict
            && self.builder.scheme().is_some_and(scheme::is_slashed)
            && slashes >= 1
        {
            if slashes != 2 {
                trace!(slashes, "collapsed authority slash run");
            }
            self.pos += slashes;
            return true;
        }
        if slashes >= 2 {
            // A third slash would begin the path.
            self.pos += 2;
            return true;
        }
        false
    }

    /// Whether an in-parse rule claims the first path segment as a host.
    fn claim_host_from_path(&self) -> bool {
        self.peek().is_some()
            && self
                .config
                .in_parse_normalizers()
                .iter()
                .any(|r| r.valid_for(self.builder) && r.claim_host_from_path(self.builder))
    }

    fn parse_host_only(&mut self) -> Result<()> {
        let segment = self.take_until(b"/?#").to_owned();
        let (host, kind) = self.normalize_host(segment)?;
        self.builder.set_host(Some(host), Some(kind));
        Ok(())
    }

    fn parse_authority(&mut self) -> Result<()> {
        let mut authority = self.take_until(b"/?#").to_owned();

        for rule in self.config.in_parse_normalizers() {
            if rule.valid_for(self.builder) {
                authority = rule.normalize_authority(authority, self.builder, self.config);
            }
        }

        // The browser flavor takes the last `@` as the userinfo delimiter;
        // the grammar licenses at most one.
        let at = match self.flavor {
            ParserFlavor::MimicBrowser => authority.rfind('@'),
            _ => authority.find('@'),
        };
        let rest = if let Some(at) = at {
            let userinfo = &authority[..at];
            let (user, password) = match userinfo.split_once(':') {
                Some((u, p)) => (u, Some(p)),
                None => (userinfo, None),
            };
            let user = self.normalize_component(user, table::USERINFO, Component::Userinfo)?;
            self.builder.set_user(Some(user));
            if let Some(p) = password {
                let p = self.normalize_component(p, table::USERINFO, Component::Userinfo)?;
                self.builder.set_password(Some(p));
            }
            authority[at + 1..].to_owned()
        } else {
            authority
        };

        self.parse_host_port(&rest)
    }

    fn parse_host_port(&mut self, rest: &str) -> Result<()> {
        if let Some(inner) = rest.strip_prefix('[') {
            let Some(close) = inner.find(']') else {
                return Err(AuthorityError::UnterminatedIpLiteral.into());
            };
            let literal = &inner[..close];
            let Some(segs) = ip::parse_ipv6(literal) else {
                return Err(AuthorityError::InvalidIpv6Addr.into());
            };
            let host = if self.config.ipv6_normalization() {
                ip::canonical_ipv6(segs)
            } else {
                literal.to_owned()
            };
            self.builder.set_host(Some(host), Some(HostKind::Ipv6));

            let after = &inner[close + 1..];
            if let Some(port) = after.strip_prefix(':') {
                self.parse_port(port)?;
            } else if !after.is_empty() {
                return Err(AuthorityError::InvalidIpv6Addr.into());
            }
            return Ok(());
        }

        let (host, port) = match rest.bytes().filter(|&b| b == b':').count() {
            0 => (rest, None),
            1 => {
                let (h, p) = rest.rsplit_once(':').unwrap();
                (h, Some(p))
            }
            // Multiple colons outside brackets: an IPv6 literal gone astray.
            _ => return Err(AuthorityError::InvalidIpv6Addr.into()),
        };

        let (host, kind) = self.normalize_host(host.to_owned())?;
        self.builder.set_host(Some(host), Some(kind));
        if let Some(port) = port {
            self.parse_port(port)?;
        }
        Ok(())
    }

    fn parse_port(&mut self, port: &str) -> Result<()> {
        if port.is_empty() {
            trace!("dropped empty port");
            return Ok(());
        }
        if !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AuthorityError::InvalidPort.into());
        }
        let value: u32 = port.parse().map_err(|_| AuthorityError::PortOutOfRange)?;
        if value > u32::from(u16::MAX) {
            return Err(AuthorityError::PortOutOfRange.into());
        }
        self.builder.set_port(Some(value));
        Ok(())
    }

    fn punycode_eligible(&self) -> bool {
        if self.config.punycode_unknown_scheme() {
            return true;
        }
        self.config.scheme_based_normalization()
            && self
                .builder
                .scheme()
                .and_then(scheme::well_known)
                .is_some_and(|s| s.punycoded_host())
    }

    /// Validates and canonicalizes a detected host, classifying it as a
    /// registered name or an IPv4 literal (IPv6 literals only arrive
    /// bracketed and never reach here).
    fn normalize_host(&mut self, mut host: String) -> Result<(String, HostKind)> {
        for rule in self.config.in_parse_normalizers() {
            if rule.valid_for(self.builder) {
                host = rule.normalize_host(host, self.builder, self.config);
            }
        }

        if self.flavor != ParserFlavor::Strict {
            let trimmed = host.trim_matches('.');
            if trimmed.len() != host.len() {
                trace!(host = %host, "trimmed stray dots from host");
                host = trimmed.to_owned();
            }
        }

        if host.is_empty() {
            return Ok((host, HostKind::RegName));
        }

        if host.contains('%') {
            match self.flavor {
                // Triplet well-formedness is checked by the character
                // pass below.
                ParserFlavor::Strict => {}
                ParserFlavor::Lax => return Err(AuthorityError::EncodedRegName.into()),
                ParserFlavor::MimicBrowser => {
                    trace!(host = %host, "decoded percent-encoded host");
                    host = encoding::percent_decode(&host, self.config.charset());
                }
            }
        }

        if !host.is_ascii() && self.flavor != ParserFlavor::Strict && self.punycode_eligible() {
            match idna::domain_to_ascii(&host) {
                Ok(ascii) => {
                    trace!(from = %host, to = %ascii, "punycoded host");
                    host = ascii;
                }
                Err(_) => return Err(AuthorityError::InvalidIdn.into()),
            }
        }

        // Unlike the other components, illegal-character escaping never
        // applies to hosts in the strict and lax flavors.
        let mut host = normalize_chars(
            &host,
            table::REG_NAME,
            Component::Host,
            self.flavor == ParserFlavor::MimicBrowser,
            self.config.case_normalization(),
            self.config,
        )?;

        if host.contains("..") {
            if self.flavor == ParserFlavor::MimicBrowser {
                while host.contains("..") {
                    host = host.replace("..", ".");
                }
                trace!(host = %host, "collapsed empty host labels");
            } else {
                return Err(AuthorityError::EmptyHostLabel.into());
            }
        }

        if ip::is_all_numeric(&host) {
            return match ip::parse_ipv4(&host) {
                Some(addr) => {
                    if self.config.ipv4_normalization() {
                        host = ip::canonical_ipv4(addr);
                    }
                    Ok((host, HostKind::Ipv4))
                }
                None => self.loose_ipv4(&host),
            };
        }
        if self.flavor == ParserFlavor::MimicBrowser && ip::ends_in_number(&host) {
            return self.loose_ipv4(&host);
        }

        Ok((host, HostKind::RegName))
    }

    fn loose_ipv4(&self, host: &str) -> Result<(String, HostKind)> {
        if self.flavor == ParserFlavor::MimicBrowser {
            if let Some(addr) = ip::parse_ipv4_loose(host) {
                trace!(host = %host, "interpreted loose numeric host as IPv4");
                return Ok((ip::canonical_ipv4(addr), HostKind::Ipv4));
            }
        }
        Err(AuthorityError::InvalidIpv4Addr.into())
    }

    fn normalize_component(&self, s: &str, table: &Table, comp: Component) -> Result<String> {
        let escape =
            self.config.encode_illegal_characters() || self.flavor == ParserFlavor::MimicBrowser;
        normalize_chars(s, table, comp, escape, false, self.config)
    }

    fn parse_path(&mut self, had_scheme: bool) -> Result<()> {
        let has_authority = self.builder.has_authority();
        let raw = self.take_until(b"?#").to_owned();

        if !had_scheme && !has_authority && self.flavor == ParserFlavor::Strict {
            // In a relative reference the first path segment cannot
            // contain a colon.
            let first = raw.split('/').next().unwrap_or("");
            if let Some(i) = first.find(':') {
                return Err(UriError::illegal(Component::Path, i));
            }
        }

        let mut path = self.normalize_component(&raw, table::PATH, Component::Path)?;

        if self.config.normalize_segments() && had_scheme && path.starts_with('/') {
            path = resolver::remove_dot_segments(&path, true)?;
        }

        self.builder.set_path(path);
        Ok(())
    }

    fn parse_query(&mut self) -> Result<()> {
        if self.peek() != Some(b'?') {
            return Ok(());
        }
        self.pos += 1;
        let raw = self.take_until(b"#").to_owned();
        let query = self.normalize_component(&raw, table::QUERY, Component::Query)?;
        self.builder.set_query(Some(query));
        Ok(())
    }

    fn parse_fragment(&mut self) -> Result<()> {
        if self.peek() != Some(b'#') {
            return Ok(());
        }
        self.pos += 1;
        let raw = self.remaining().to_owned();
        self.pos = self.bytes.len();
        let fragment = self.normalize_component(&raw, table::FRAGMENT, Component::Fragment)?;
        self.builder.set_fragment(Some(fragment));
        Ok(())
    }
}

/// Shared per-component character pass: validates each byte against the
/// table, decodes percent-triplets whose octet is unreserved (decoding a
/// reserved delimiter would change the component's structure), re-cases
/// surviving triplets, and either escapes or rejects illegal characters.
fn normalize_chars(
    s: &str,
    table: &Table,
    comp: Component,
    escape: bool,
    lowercase: bool,
    config: &UriConfig,
) -> Result<String> {
    let case = config.percent_encoding_case();
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let mut x = bytes[i];
        if x == b'%' && table.allows_pct_encoded() {
            if let Some(octet) = bytes
                .get(i + 1)
                .zip(bytes.get(i + 2))
                .and_then(|(&hi, &lo)| decode_octet(hi, lo))
            {
                if config.percent_encoding_normalization() && table::UNRESERVED.allows(octet) {
                    let octet = if lowercase {
                        octet.to_ascii_lowercase()
                    } else {
                        octet
                    };
                    out.push(octet as char);
                } else {
                    out.push('%');
                    out.push(case.fold(bytes[i + 1]));
                    out.push(case.fold(bytes[i + 2]));
                }
                i += 3;
                continue;
            }
            // A stray `%` with no valid octet behind it.
            if escape {
                push_pct_encoded(&mut out, b'%', case);
                i += 1;
                continue;
            }
            return Err(UriError::illegal(comp, i));
        }

        if lowercase {
            x = x.to_ascii_lowercase();
        }
        if table.allows(x) {
            out.push(x as char);
        } else if escape {
            push_pct_encoded(&mut out, x, case);
        } else {
            return Err(UriError::illegal(comp, i));
        }
        i += 1;
    }
    Ok(out)
}

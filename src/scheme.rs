//! Registry of well-known schemes.
//!
//! The registry carries only what normalization needs: the default port to
//! elide, whether the scheme's authority is a DNS name eligible for
//! punycoding, and whether the scheme is hierarchical ("slashed").

/// Normalization-relevant facts about a well-known scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemeInfo {
    name: &'static str,
    default_port: Option<u16>,
    punycoded_host: bool,
    slashed: bool,
}

impl SchemeInfo {
    /// The scheme name, lower-cased.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The port implied when none is given.
    pub fn default_port(&self) -> Option<u16> {
        self.default_port
    }

    /// Whether hosts under this scheme are DNS names that may be punycoded.
    pub fn punycoded_host(&self) -> bool {
        self.punycoded_host
    }

    /// Whether the scheme is hierarchical, i.e. written with `://`.
    pub fn slashed(&self) -> bool {
        self.slashed
    }
}

const fn scheme(
    name: &'static str,
    default_port: Option<u16>,
    punycoded_host: bool,
    slashed: bool,
) -> SchemeInfo {
    SchemeInfo {
        name,
        default_port,
        punycoded_host,
        slashed,
    }
}

static WELL_KNOWN: &[SchemeInfo] = &[
    scheme("http", Some(80), true, true),
    scheme("https", Some(443), true, true),
    scheme("ftp", Some(21), true, true),
    scheme("ftps", Some(990), true, true),
    scheme("ws", Some(80), true, true),
    scheme("wss", Some(443), true, true),
    scheme("ssh", Some(22), true, true),
    scheme("sftp", Some(22), true, true),
    scheme("gopher", Some(70), true, true),
    scheme("dns", Some(53), true, false),
    scheme("file", None, false, true),
];

/// Looks up a scheme by its lower-cased name.
pub fn well_known(name: &str) -> Option<&'static SchemeInfo> {
    WELL_KNOWN.iter().find(|s| s.name == name)
}

/// The default port for a scheme, if the scheme is known and has one.
pub fn default_port(name: &str) -> Option<u16> {
    well_known(name).and_then(SchemeInfo::default_port)
}

/// Whether `name` names a slashed scheme.
pub(crate) fn is_slashed(name: &str) -> bool {
    well_known(name).is_some_and(SchemeInfo::slashed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lookup() {
        assert_eq!(default_port("http"), Some(80));
        assert_eq!(default_port("https"), Some(443));
        assert_eq!(default_port("file"), None);
        assert_eq!(default_port("example"), None);
        assert!(well_known("https").unwrap().punycoded_host());
        assert!(!well_known("dns").unwrap().slashed());
    }
}

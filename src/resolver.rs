//! RFC 3986 §5 reference resolution.

use crate::{builder::UriBuilder, error::UriError};

type Result<T> = core::result::Result<T, UriError>;

/// Combines a base URI and a relative reference into an absolute target,
/// following the transformation of [Section 5.3 of RFC 3986][resolve].
///
/// [resolve]: https://datatracker.ietf.org/doc/html/rfc3986/#section-5.3
///
/// A resolver is a pure function over two builders; it performs no I/O and
/// carries no mutable state.
#[derive(Clone, Copy, Debug)]
pub struct ReferenceResolver {
    strict_scheme: bool,
    allow_ascent: bool,
}

impl Default for ReferenceResolver {
    fn default() -> Self {
        ReferenceResolver {
            strict_scheme: true,
            allow_ascent: true,
        }
    }
}

impl ReferenceResolver {
    pub fn new() -> ReferenceResolver {
        ReferenceResolver::default()
    }

    /// With strict scheme comparison off, a reference carrying the same
    /// scheme as the base is resolved as if it were scheme-less, which is
    /// what legacy browsers did with `http:g`.
    pub fn strict_scheme(mut self, strict: bool) -> ReferenceResolver {
        self.strict_scheme = strict;
        self
    }

    /// Whether `..` segments may ascend above the root and be silently
    /// dropped (the RFC behavior). When disabled, ascent raises
    /// [`UriError::UnresolvableReference`].
    pub fn allow_ascent(mut self, allow: bool) -> ReferenceResolver {
        self.allow_ascent = allow;
        self
    }

    /// Resolves `reference` against `base` into a new builder.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::NotAbsolute`] if the base has no scheme, and
    /// [`UriError::UnresolvableReference`] on path ascent when ascent is
    /// disallowed.
    pub fn resolve(&self, base: &UriBuilder, reference: &UriBuilder) -> Result<UriBuilder> {
        if base.scheme().is_none() {
            return Err(UriError::NotAbsolute);
        }

        let mut target = UriBuilder::new(reference.charset());

        let use_reference_scheme = match reference.scheme() {
            Some(s) => self.strict_scheme || base.scheme() != Some(s),
            None => false,
        };

        if use_reference_scheme {
            target.set_scheme(reference.scheme().map(str::to_owned));
            if reference.has_authority() {
                target.adopt_authority(reference);
            }
            target.set_path(self.target_path(reference.path())?);
            target.set_query(reference.query().map(str::to_owned));
        } else if reference.has_authority() {
            target.set_scheme(base.scheme().map(str::to_owned));
            target.adopt_authority(reference);
            target.set_path(self.target_path(reference.path())?);
            target.set_query(reference.query().map(str::to_owned));
        } else {
            target.set_scheme(base.scheme().map(str::to_owned));
            if base.has_authority() {
                target.adopt_authority(base);
            }
            if reference.path().is_empty() {
                target.set_path(base.path().to_owned());
                target.set_query(
                    reference
                        .query()
                        .or_else(|| base.query())
                        .map(str::to_owned),
                );
            } else {
                if reference.is_abs_path() {
                    target.set_path(remove_dot_segments(reference.path(), self.allow_ascent)?);
                } else {
                    let merged = merge_paths(base, reference.path());
                    target.set_path(remove_dot_segments(&merged, self.allow_ascent)?);
                }
                target.set_query(reference.query().map(str::to_owned));
            }
        }

        target.set_fragment(reference.fragment().map(str::to_owned));
        Ok(target)
    }

    fn target_path(&self, path: &str) -> Result<String> {
        // Dot segments are only removed from hierarchical (absolute)
        // paths; a rootless opaque path keeps them.
        if path.starts_with('/') {
            remove_dot_segments(path, self.allow_ascent)
        } else {
            Ok(path.to_owned())
        }
    }
}

/// Merges a reference path onto the base per Section 5.3 of RFC 3986:
/// everything after the last `/` of the base path is replaced.
fn merge_paths(base: &UriBuilder, reference_path: &str) -> String {
    if base.has_authority() && base.path().is_empty() {
        return format!("/{reference_path}");
    }
    match base.path().rfind('/') {
        Some(i) => format!("{}{}", &base.path()[..=i], reference_path),
        None => reference_path.to_owned(),
    }
}

/// Removes `.` and `..` segments per [Section 5.2.4 of RFC 3986][dotseg].
///
/// [dotseg]: https://datatracker.ietf.org/doc/html/rfc3986/#section-5.2.4
///
/// With `allow_ascent` off, a `..` that would climb above the root (or the
/// start of a rootless path) fails instead of being dropped.
pub(crate) fn remove_dot_segments(path: &str, allow_ascent: bool) -> Result<String> {
    let mut buf = String::with_capacity(path.len());
    for seg in path.split_inclusive('/') {
        if seg == "." || seg == "./" {
            let keep = buf.rfind('/').map_or(0, |i| i + 1);
            buf.truncate(keep);
        } else if seg == ".." || seg == "../" {
            // Completed segments always end with a slash, so the buffer
            // here is empty, "/" or ends with "/".
            if buf.is_empty() || buf == "/" {
                if !allow_ascent {
                    return Err(UriError::UnresolvableReference);
                }
            } else {
                buf.truncate(buf.len() - 1);
                let keep = buf.rfind('/').map_or(0, |i| i + 1);
                buf.truncate(keep);
            }
        } else {
            buf.push_str(seg);
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_dot_segments() {
        let rm = |p| remove_dot_segments(p, true).unwrap();
        assert_eq!(rm("/a/b/c/./../../g"), "/a/g");
        assert_eq!(rm("mid/content=5/../6"), "mid/6");
        assert_eq!(rm("/../g"), "/g");
        assert_eq!(rm("../g"), "g");
        assert_eq!(rm("/a/../"), "/");
        assert_eq!(rm("/a/.."), "/");
        assert_eq!(rm("/a/."), "/a/");
        assert_eq!(rm(""), "");
    }

    #[test]
    fn refuses_ascent_when_disallowed() {
        assert_eq!(
            remove_dot_segments("/../g", false),
            Err(UriError::UnresolvableReference)
        );
        assert_eq!(remove_dot_segments("/a/../g", false).unwrap(), "/g");
    }
}

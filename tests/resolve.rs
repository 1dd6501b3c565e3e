use surt_uri::{ReferenceResolver, UriConfig, UriError};

/// RFC-faithful configuration: resolver output is not massaged by
/// scheme-based normalization, so the Section 5.4 vectors apply verbatim.
fn rfc_config() -> UriConfig {
    UriConfig::strict().scheme_based_normalization(false).build()
}

#[track_caller]
fn check(config: &UriConfig, base: &str, reference: &str, expected: &str) {
    let uri = config.resolve(base, reference).unwrap();
    assert_eq!(uri.to_string(), expected, "resolving {reference:?}");
}

#[test]
fn rfc_normal_examples() {
    // Section 5.4.1 of RFC 3986.
    let config = rfc_config();
    let base = "http://a/b/c/d;p?q";

    check(&config, base, "g:h", "g:h");
    check(&config, base, "g", "http://a/b/c/g");
    check(&config, base, "./g", "http://a/b/c/g");
    check(&config, base, "g/", "http://a/b/c/g/");
    check(&config, base, "/g", "http://a/g");
    check(&config, base, "//g", "http://g");
    check(&config, base, "?y", "http://a/b/c/d;p?y");
    check(&config, base, "g?y", "http://a/b/c/g?y");
    check(&config, base, "#s", "http://a/b/c/d;p?q#s");
    check(&config, base, "g#s", "http://a/b/c/g#s");
    check(&config, base, "g?y#s", "http://a/b/c/g?y#s");
    check(&config, base, ";x", "http://a/b/c/;x");
    check(&config, base, "g;x", "http://a/b/c/g;x");
    check(&config, base, "g;x?y#s", "http://a/b/c/g;x?y#s");
    check(&config, base, "", "http://a/b/c/d;p?q");
    check(&config, base, ".", "http://a/b/c/");
    check(&config, base, "./", "http://a/b/c/");
    check(&config, base, "..", "http://a/b/");
    check(&config, base, "../", "http://a/b/");
    check(&config, base, "../g", "http://a/b/g");
    check(&config, base, "../..", "http://a/");
    check(&config, base, "../../", "http://a/");
    check(&config, base, "../../g", "http://a/g");
}

#[test]
fn rfc_abnormal_examples() {
    // Section 5.4.2 of RFC 3986.
    let config = rfc_config();
    let base = "http://a/b/c/d;p?q";

    check(&config, base, "../../../g", "http://a/g");
    check(&config, base, "../../../../g", "http://a/g");

    check(&config, base, "/./g", "http://a/g");
    check(&config, base, "/../g", "http://a/g");
    check(&config, base, "g.", "http://a/b/c/g.");
    check(&config, base, ".g", "http://a/b/c/.g");
    check(&config, base, "g..", "http://a/b/c/g..");
    check(&config, base, "..g", "http://a/b/c/..g");

    check(&config, base, "./../g", "http://a/b/g");
    check(&config, base, "./g/.", "http://a/b/c/g/");
    check(&config, base, "g/./h", "http://a/b/c/g/h");
    check(&config, base, "g/../h", "http://a/b/c/h");
    check(&config, base, "g;x=1/./y", "http://a/b/c/g;x=1/y");
    check(&config, base, "g;x=1/../y", "http://a/b/c/y");

    check(&config, base, "g?y/./x", "http://a/b/c/g?y/./x");
    check(&config, base, "g?y/../x", "http://a/b/c/g?y/../x");
    check(&config, base, "g#s/./x", "http://a/b/c/g#s/./x");
    check(&config, base, "g#s/../x", "http://a/b/c/g#s/../x");

    // Strict scheme comparison keeps the reference opaque.
    check(&config, base, "http:g", "http:g");
}

#[test]
fn non_strict_scheme_comparison() {
    let config = UriConfig::strict()
        .scheme_based_normalization(false)
        .resolver(ReferenceResolver::new().strict_scheme(false))
        .build();
    check(&config, "http://a/b/c/d;p?q", "http:g", "http://a/b/c/g");
    // A different scheme is still taken verbatim.
    check(&config, "http://a/b/c/d;p?q", "ftp:g", "ftp:g");
}

#[test]
fn resolves_against_parsed_base() {
    let config = rfc_config();
    let base = config.parse("http://a/b/c/d;p?q").unwrap();
    let uri = config.resolve(&base, "../g").unwrap();
    assert_eq!(uri.to_string(), "http://a/b/g");
}

#[test]
fn resolution_feeds_post_normalization() {
    // Under a canonicalizing config the resolved target is normalized
    // like any parsed URI: empty paths become "/" and default ports go.
    let config = UriConfig::lax().build();
    check(&config, "http://a/b/c", "//g:80", "http://g/");
    check(&config, "http://a/b/c?q", "", "http://a/b/c?q");
}

#[test]
fn base_must_be_absolute() {
    let config = rfc_config();
    assert_eq!(
        config.resolve("/only/a/path", "g"),
        Err(UriError::NotAbsolute)
    );
}

#[test]
fn refuses_ascent_when_pedantic() {
    let config = UriConfig::strict()
        .resolver(ReferenceResolver::new().allow_ascent(false))
        .build();
    assert_eq!(
        config.resolve("http://a/", "../g"),
        Err(UriError::UnresolvableReference)
    );
    assert_eq!(
        config.resolve("http://a/b/", "../g").unwrap().to_string(),
        "http://a/g"
    );
}

use pretty_assertions::assert_eq;
use surt_uri::UriConfig;

#[test]
fn rfc_syntax_normalization() {
    let config = UriConfig::strict().build();

    // Example from Section 6.2 of RFC 3986 (the empty-path rule also
    // fires under scheme-based normalization).
    let u = config.parse("eXAMPLE://a/./b/../b/%63/%7bfoo%7d").unwrap();
    assert_eq!(u.to_string(), "example://a/b/c/%7Bfoo%7D");

    // Lowercase percent-encoded octets are re-cased.
    let u = config.parse("/%3a").unwrap();
    assert_eq!(u.to_string(), "/%3A");

    // Uppercase letters in scheme and registered name.
    let u = config.parse("HTTP://www.EXAMPLE.com/").unwrap();
    assert_eq!(u.to_string(), "http://www.example.com/");

    // Percent-encoded uppercase letters in the registered name.
    let u = config.parse("HTTP://%45XAMPLE.%43Om/").unwrap();
    assert_eq!(u.to_string(), "http://example.com/");

    // Percent-encoded dot segments are decoded, then removed.
    let u = config.parse("http://a/b/c/%2E/%2E./%2e%2E/d").unwrap();
    assert_eq!(u.to_string(), "http://a/d");

    // Excess parent segments stop at the root.
    let u = config.parse("http://a/../../../g").unwrap();
    assert_eq!(u.to_string(), "http://a/g");

    // Dot segments stay in relative references and rootless paths.
    let u = config.parse("foo/../bar").unwrap();
    assert_eq!(u.to_string(), "foo/../bar");
    let u = config.parse("/foo/../bar").unwrap();
    assert_eq!(u.to_string(), "/foo/../bar");
    let u = config.parse("foo:bar/../baz").unwrap();
    assert_eq!(u.to_string(), "foo:bar/../baz");

    // A URI with an absolute path does get them removed.
    let u = config.parse("foo:/bar/./../baz").unwrap();
    assert_eq!(u.to_string(), "foo:/baz");
}

#[test]
fn percent_encoded_unreserved_is_decoded() {
    let config = UriConfig::strict().build();
    let u = config
        .parse("/%41%42%43%61%62%63%30%31%32%2D%2E%5F%7E")
        .unwrap();
    assert_eq!(u.to_string(), "/ABCabc012-._~");
}

#[test]
fn case_normalization_can_be_disabled() {
    let config = UriConfig::strict().case_normalization(false).build();
    let u = config.parse("HTTP://www.EXAMPLE.com/Path").unwrap();
    assert_eq!(u.scheme(), Some("HTTP"));
    assert_eq!(u.host(), Some("www.EXAMPLE.com"));
}

#[test]
fn segment_normalization_can_be_disabled() {
    let config = UriConfig::strict().normalize_segments(false).build();
    let u = config.parse("http://a/b/../c").unwrap();
    assert_eq!(u.path(), "/b/../c");
}

#[test]
fn reparsing_is_idempotent() {
    let configs = [
        ("strict", UriConfig::strict().build()),
        ("lax", UriConfig::lax().build()),
        ("mimic_browser", UriConfig::mimic_browser().build()),
        ("legacy_archive", UriConfig::legacy_archive().build()),
    ];
    let inputs = [
        "http://example.com",
        "HTTP://EXAMPLE.com:80/a/../b/./c//d?b=2&a=1#frag",
        "http://www.archive.org%20%20/index.html",
        " http://example.com/a b ",
        "example.com/x",
        "//example.com/x",
        "http://xn--rksmrgs-5wao1o.josefsson.org/",
        "http://räksmörgås.josefsson.org/",
        "http://127.0.0.1:8080/",
        "http://[2001:0DB8::7]:443/x",
        "a/b/c",
        "?q",
        "",
        "http://example.com/%7e%41%20x",
        "http://example.com/100%",
        "dns:archive.org",
        "mailto:john@example.com",
        "http://u:p@example.com:8042/over/there?name=ferret#nose",
    ];

    for (name, config) in &configs {
        for input in inputs {
            let Ok(first) = config.parse(input) else {
                continue;
            };
            let rendered = first.to_string();
            let second = config
                .parse(rendered.clone())
                .unwrap_or_else(|e| panic!("{name}: reparse of {rendered:?} failed: {e}"));
            assert_eq!(first, second, "{name}: {input:?} vs reparse of {rendered:?}");
        }
    }
}

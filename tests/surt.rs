use surt_uri::{surt, UriConfig, UriFormat};

#[test]
fn reverses_host_labels() {
    assert_eq!(surt("http://www.archive.org/").unwrap(), "org,archive)/");
    assert_eq!(
        surt("http://archive.org/goo/?b&a").unwrap(),
        "org,archive)/goo?a&b"
    );
}

#[test]
fn strips_www_variants() {
    assert_eq!(surt("http://www2.example.com/").unwrap(), "com,example)/");
    assert_eq!(surt("http://www13.example.com/a").unwrap(), "com,example)/a");
    // Nothing dotted would remain, so the prefix stays.
    assert_eq!(surt("http://www.com/").unwrap(), "com,www)/");
}

#[test]
fn keeps_explicit_port_and_ip_hosts() {
    assert_eq!(
        surt("http://example.com:8080/x").unwrap(),
        "com,example:8080)/x"
    );
    // IP hosts are never reversed.
    assert_eq!(surt("http://127.0.0.1/x").unwrap(), "127.0.0.1)/x");
    assert_eq!(surt("http://[2001:db8::7]/x").unwrap(), "[2001:db8::7])/x");
}

#[test]
fn sorts_query_parameters() {
    assert_eq!(
        surt("http://example.com/?c=3&a=1&b=2").unwrap(),
        "com,example)/?a=1&b=2&c=3"
    );
    assert_eq!(
        surt("http://example.com/?b=1&a=1").unwrap(),
        surt("http://example.com/?a=1&b=1").unwrap()
    );
}

#[test]
fn strips_session_ids() {
    let config = UriConfig::surt_key().build();

    let u = config
        .parse(
            "http://example.com/cart;jsessionid=0123456789abcdef0123456789abcdef\
             ?foo=1&jsessionid=0123456789abcdef0123456789abcdef&bar=2",
        )
        .unwrap();
    // Only the session tokens go; the other parameters and their `&`
    // structure survive.
    assert_eq!(u.path(), "/cart");
    assert_eq!(u.query(), Some("foo=1&bar=2"));
    assert_eq!(u.to_string(), "com,example)/cart?bar=2&foo=1");

    let u = config
        .parse("http://example.com/?CFID=12345&CFTOKEN=abcde12345&x=1")
        .unwrap();
    assert_eq!(u.query(), Some("x=1"));

    // CFID without its CFTOKEN partner is left alone.
    let u = config.parse("http://example.com/?CFID=12345&x=1").unwrap();
    assert_eq!(u.query(), Some("CFID=12345&x=1"));

    let u = config
        .parse("http://example.com/?phpsessid=0123456789abcdef0123456789abcdef")
        .unwrap();
    assert_eq!(u.query(), None);

    let u = config
        .parse("http://example.com/?ASPSESSIONIDQQGGGNCU=HLLLLGMCICDEEHEBNJHPNMHA&y=2")
        .unwrap();
    assert_eq!(u.query(), Some("y=2"));
}

#[test]
fn strips_single_trailing_slash_only() {
    assert_eq!(surt("http://example.com/a/").unwrap(), "com,example)/a");
    assert_eq!(surt("http://example.com/").unwrap(), "com,example)/");
}

#[test]
fn surt_ignores_credentials_and_fragment() {
    assert_eq!(
        surt("http://user:pw@example.com/a#frag").unwrap(),
        "com,example)/a"
    );
}

#[test]
fn surt_decodes_punycoded_hosts() {
    assert_eq!(
        surt("http://xn--rksmrgs-5wao1o.josefsson.org/").unwrap(),
        "org,josefsson,räksmörgås)/"
    );
}

#[test]
fn legacy_surt_key_is_byte_stable() {
    let config = UriConfig::legacy_surt_key().build();
    let u = config
        .parse("https://www.Example.COM:8443/A/B?b=2&a=1")
        .unwrap();
    assert_eq!(u.to_string(), "com,example:8443)/a/b?a=1&b=2");

    // The legacy encoder never decodes the host.
    let u = config
        .parse("http://xn--rksmrgs-5wao1o.josefsson.org/")
        .unwrap();
    assert_eq!(u.to_string(), "org,josefsson,xn--rksmrgs-5wao1o)/");
}

#[test]
fn custom_formats_on_one_uri() {
    let config = UriConfig::lax().build();
    let u = config
        .parse("http://user:pw@www.example.com/a/b?x=1#frag")
        .unwrap();

    assert_eq!(
        u.to_custom_string(&UriFormat::plain()),
        "http://user:pw@www.example.com/a/b?x=1#frag"
    );
    assert_eq!(
        u.to_custom_string(&UriFormat::usable()),
        "http://user:pw@www.example.com/a/b?x=1"
    );
    assert_eq!(
        u.to_custom_string(&UriFormat::canonical()),
        "http://www.example.com/a/b?x=1"
    );
    // A format with a SURT encoder renders the authority reversed and
    // keeps the scheme's opening parenthesis.
    assert_eq!(
        u.to_custom_string(&UriFormat::surt().with_ignore_scheme(false)),
        "http://(com,example,www)/a/b?x=1"
    );
}

use surt_uri::{ParsedQuery, UriConfig};

#[test]
fn rendering_is_order_independent() {
    let permutations = [
        "a=1&b=2&c&d=",
        "b=2&a=1&d=&c",
        "c&d=&a=1&b=2",
        "d=&c&b=2&a=1",
    ];
    let expected = "a=1&b=2&c&d=";
    for p in permutations {
        assert_eq!(ParsedQuery::parse(p).to_string(), expected, "from {p:?}");
    }
}

#[test]
fn values_merge_and_sort_within_a_key() {
    let q = ParsedQuery::parse("k=b&x=9&k=a&k=c");
    assert_eq!(q.len(), 2);
    let values: Vec<_> = q
        .get("k")
        .unwrap()
        .values()
        .iter()
        .map(|v| v.as_deref().unwrap())
        .collect();
    assert_eq!(values, ["a", "b", "c"]);
    assert_eq!(q.to_string(), "k=a&k=b&k=c&x=9");
}

#[test]
fn lazily_computed_from_uri() {
    let config = UriConfig::lax().build();
    let u = config.parse("http://example.com/?z=26&a=1&m=13").unwrap();

    // The raw query keeps its order; the parsed view is canonical.
    assert_eq!(u.query(), Some("z=26&a=1&m=13"));
    assert_eq!(u.parsed_query().to_string(), "a=1&m=13&z=26");
    assert!(u.parsed_query().contains("m"));
    assert_eq!(u.parsed_query().get("q"), None);

    let u = config.parse("http://example.com/").unwrap();
    assert!(u.parsed_query().is_empty());
}

#[test]
fn mutators_leave_the_source_untouched() {
    let q = ParsedQuery::parse("b=2&a=1");
    let q2 = q.add("a", Some("0")).put("b", Some("9")).remove("missing");
    assert_eq!(q.to_string(), "a=1&b=2");
    assert_eq!(q2.to_string(), "a=0&a=1&b=9");

    let emptied = q.remove("a").remove("b");
    assert!(emptied.is_empty());
    assert_eq!(emptied.to_string(), "");
}

#[test]
fn valueless_and_empty_values_are_distinct() {
    let q = ParsedQuery::parse("flag&flag=");
    let entry = q.get("flag").unwrap();
    assert_eq!(entry.values(), [None, Some(String::new())]);
    assert_eq!(q.to_string(), "flag&flag=");
}

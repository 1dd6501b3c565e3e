#![cfg(feature = "serde")]

use surt_uri::Uri;

#[test]
fn round_trips_as_string() {
    let uri = surt_uri::parse("http://www.example.com/a?b=1").unwrap();
    let json = serde_json::to_string(&uri).unwrap();
    assert_eq!(json, "\"http://www.example.com/a?b=1\"");

    let back: Uri = serde_json::from_str(&json).unwrap();
    assert_eq!(back, uri);
}

#[test]
fn deserialization_rejects_garbage() {
    let err = serde_json::from_str::<Uri>("\"http://exa<mple.com/\"");
    assert!(err.is_err());
}

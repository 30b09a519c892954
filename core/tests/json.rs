use unify_core::json::parse_body;

#[test]
fn parses_objects_and_arrays() {
    let v = parse_body(br#"{"code":"00000","data":[1,2]}"#).unwrap();
    assert_eq!(v["code"], "00000");
    assert_eq!(v["data"][1], 2);
}

#[test]
fn empty_or_garbage_is_none() {
    assert!(parse_body(b"").is_none());
    assert!(parse_body(b"  \n").is_none());
    assert!(parse_body(b"<html>502 Bad Gateway</html>").is_none());
}

use unify_core::{Error, ErrorKind};

#[test]
fn kinds_round_trip_through_messages() {
    for kind in ErrorKind::ALL {
        let err = kind.with_message("boom");
        assert_eq!(err.kind(), kind);
        assert_eq!(err.message(), "boom");
    }
}

#[test]
fn display_includes_message() {
    let err = Error::InvalidOrder("market buy needs a price".into());
    assert_eq!(err.to_string(), "invalid order: market buy needs a price");
    assert_eq!(ErrorKind::DDoSProtection.to_string(), "DDoSProtection");
}

#[test]
fn converts_into_anyhow() {
    let err: anyhow::Error = Error::ExchangeNotAvailable("down".into()).into();
    let back = err.downcast_ref::<Error>().unwrap();
    assert_eq!(back.kind(), ErrorKind::ExchangeNotAvailable);
}

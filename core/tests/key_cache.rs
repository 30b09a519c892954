use std::sync::atomic::{AtomicUsize, Ordering};
use unify_core::key_cache::{fingerprint, DerivedKeyCache};

#[test]
fn derives_once_per_input() {
    let cache = DerivedKeyCache::new();
    let calls = AtomicUsize::new(0);
    let derive = |s: &str| {
        calls.fetch_add(1, Ordering::SeqCst);
        s.to_uppercase()
    };
    let a = cache.get_or_derive("secret", derive);
    let b = cache.get_or_derive("secret", derive);
    assert_eq!(&*a, "SECRET");
    assert_eq!(a, b);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    cache.get_or_derive("other", derive);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn fingerprint_hides_input() {
    let fp = fingerprint("secret");
    assert_eq!(fp.len(), 64);
    assert!(!fp.contains("secret"));
    assert_eq!(fp, fingerprint("secret"));
}

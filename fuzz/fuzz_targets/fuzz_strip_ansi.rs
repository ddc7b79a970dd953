#![no_main]
use libfuzzer_sys::fuzz_target;
use strandlog::fmt::strip_ansi;

fuzz_target!(|data: &str| {
    let stripped = strip_ansi(data);
    // Nothing persisted may carry an escape byte
    assert!(!stripped.contains('\x1b'));
    assert!(stripped.len() <= data.len());
});

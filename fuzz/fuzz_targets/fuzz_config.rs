#![no_main]
use libfuzzer_sys::fuzz_target;
use strandlog::config::Config;
use strandlog::parse_size;

fuzz_target!(|data: &str| {
    let _ = parse_size(data);

    // Every accessor must report bad values as errors, never panic
    if let Ok(config) = Config::parse(data) {
        let _ = config.level();
        let _ = config.internal_level();
        let _ = config.dispatch_mode();
        let _ = config.queue_config();
        let _ = config.rotation_policy();
    }
});

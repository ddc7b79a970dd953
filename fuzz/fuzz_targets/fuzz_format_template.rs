#![no_main]
use libfuzzer_sys::fuzz_target;
use strandlog::fmt::FormatTemplate;
use strandlog::{Level, Record};

fuzz_target!(|data: &str| {
    // Must not panic on any template string, including unclosed braces
    let template = FormatTemplate::parse(data);
    let record = Record::new(Level::Info, "test");
    let _ = template.render(&record);

    // The input doubles as a strftime pattern
    let template = FormatTemplate::default().timestamp_format(data);
    let _ = template.render(&record);
});

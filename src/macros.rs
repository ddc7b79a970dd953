//! `format!`-style macros over the global logger.
//!
//! The level check runs before the arguments are formatted; a filtered
//! `debug!` never allocates.

#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)+) => {{
        let level: $crate::Level = $level;
        if $crate::global::enabled(level) {
            $crate::global::log_record($crate::Record::new(level, ::std::format!($($arg)+)));
        }
    }};
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => { $crate::log!($crate::Level::Debug, $($arg)+) };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => { $crate::log!($crate::Level::Info, $($arg)+) };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => { $crate::log!($crate::Level::Warning, $($arg)+) };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => { $crate::log!($crate::Level::Error, $($arg)+) };
}

#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => { $crate::log!($crate::Level::Fatal, $($arg)+) };
}

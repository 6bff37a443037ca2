// Logging shims. Each forwards to `log` and/or `defmt` depending on the enabled features and
// expands to nothing when neither is enabled. Arguments must implement both `Debug` and
// `defmt::Format` (or be integers and `&str`) so one format string works for both backends.

macro_rules! trace {
    ($($arg:tt)+) => {{
        #[cfg(feature = "log")]
        log::trace!($($arg)+);
        #[cfg(feature = "defmt")]
        defmt::trace!($($arg)+);
    }};
}

macro_rules! debug {
    ($($arg:tt)+) => {{
        #[cfg(feature = "log")]
        log::debug!($($arg)+);
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)+);
    }};
}

macro_rules! warn {
    ($($arg:tt)+) => {{
        #[cfg(feature = "log")]
        log::warn!($($arg)+);
        #[cfg(feature = "defmt")]
        defmt::warn!($($arg)+);
    }};
}

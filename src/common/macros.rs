//! Macros.

/// Logs at info level, using `info!`. Inactive in bench mode.
#[macro_export]
#[cfg(feature = "bench")]
macro_rules! log_info {
    ($($tt:tt)*) => {
        ()
    };
}
#[macro_export]
#[cfg(not(feature = "bench"))]
macro_rules! log_info {
    ($($tt:tt)*) => {
        info! { $($tt)* }
    };
}

/// Logs at debug level, using `debug!`. Inactive in bench mode.
#[macro_export]
#[cfg(feature = "bench")]
macro_rules! log_debug {
    ($($tt:tt)*) => {
        ()
    };
}
#[macro_export]
#[cfg(not(feature = "bench"))]
macro_rules! log_debug {
    ($($tt:tt)*) => {
        debug! { $($tt)* }
    };
}

/// Does something if debug logging is active. Inactive in bench mode.
#[macro_export]
#[cfg(feature = "bench")]
macro_rules! if_debug {
    ($($blah:tt)*) => {
        ()
    };
}
#[macro_export]
#[cfg(not(feature = "bench"))]
macro_rules! if_debug {
    ($($blah:tt)*) => {
        if log_enabled!(::log::Level::Debug) {
            $($blah)*
        }
    };
}

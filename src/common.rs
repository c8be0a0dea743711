pub(crate) mod error;
pub(crate) mod time;

/// Formats the optional cache name as a log line prefix, e.g. `"[users] "`.
#[cfg(feature = "logging")]
pub(crate) fn log_prefix(cache_name: Option<&str>) -> String {
    cache_name
        .map(|name| format!("[{name}] "))
        .unwrap_or_default()
}

/// Extracts the message from a panic payload, if it is a `&str` or a `String`.
#[cfg(feature = "logging")]
pub(crate) fn panic_message<'a>(
    payload: &'a (dyn std::any::Any + Send + 'static),
) -> Option<std::borrow::Cow<'a, str>> {
    (payload.downcast_ref::<&str>().map(|s| (*s).into()))
        .or_else(|| payload.downcast_ref::<String>().map(|s| s.as_str().into()))
}

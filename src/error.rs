//! Error codes shared by the crate's error enums.
//!
//! Each concern owns its own `thiserror` enum (`CodecError` in [`crate::codec`],
//! `PreviewError` in [`crate::preview`]). They all implement [`ErrorCode`] so
//! hosts can show a grepable code next to the human message and decide whether
//! to offer a retry affordance.

/// Grepable error code and retryable flag for host-facing errors.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Render an error as `"<code>: <message>"` for display surfaces.
pub fn describe(err: &dyn ErrorCode) -> String {
    format!("{}: {err}", err.error_code())
}

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

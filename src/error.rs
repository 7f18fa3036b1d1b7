//! Error type and the process-wide fatal-error hook.
//!
//! Recoverable failures (bad arguments, RLE capacity problems) come back
//! as [`Error`] values. Payload-dependent fatal conditions inside the
//! bitstream codecs go through a single process-wide handler instead, so
//! the codecs can keep the best-effort partial-return contract: the hook
//! fires, and if it returns, the operation reports whatever it managed to
//! produce. The default handler logs the message and aborts the process.

use std::sync::RwLock;

use log::error;

/// Errors reported by the codec entry points.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The input buffer was empty.
    #[error("input buffer is empty")]
    EmptyInput,
    /// The output buffer was empty.
    #[error("output buffer is empty")]
    EmptyOutput,
    /// The output buffer cannot hold the next packet or run.
    #[error("output buffer too small")]
    OutputOverflow,
    /// The input ended in the middle of a packet.
    #[error("input ends mid-packet")]
    TruncatedInput,
    /// The bit stream ended before the requested bits were read.
    #[error("unexpected end of bit stream")]
    UnexpectedEnd,
}

/// Handler invoked on fatal conditions. It is not expected to return,
/// but the codecs tolerate one that does.
pub type FatalHandler = fn(&str);

static FATAL_HANDLER: RwLock<FatalHandler> = RwLock::new(default_handler);

fn default_handler(message: &str) {
    error!("fatal codec error: {message}");
    std::process::abort();
}

/// Replace the fatal-error handler for the whole process. Install before
/// any codec runs; the default logs the message and aborts.
pub fn set_fatal_handler(handler: FatalHandler) {
    *FATAL_HANDLER.write().unwrap() = handler;
}

/// Report a fatal condition through the installed handler.
pub(crate) fn fatal(message: &str) {
    let handler = *FATAL_HANDLER.read().unwrap();
    handler(message);
}

#[cfg(test)]
mod test {
    use super::{fatal, set_fatal_handler, Error};

    fn quiet(_message: &str) {}

    #[test]
    fn replaced_handler_returns() {
        set_fatal_handler(quiet);
        fatal("should not abort");
    }

    #[test]
    fn display_messages() {
        assert_eq!(Error::EmptyInput.to_string(), "input buffer is empty");
        assert_eq!(
            Error::UnexpectedEnd.to_string(),
            "unexpected end of bit stream"
        );
    }
}

//! Assertion event data.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::sync::atomic::{AtomicBool, Ordering};

/// A failed runtime invariant, as observed at its call site.
///
/// Location fields borrow the static strings the assertion macros capture;
/// message and trace fields are owned. Textual fields use the empty string
/// for "absent", which keeps the plain log format fixed at seven fields
/// while the structured record drops absent keys entirely.
#[derive(Debug, Clone)]
pub struct AssertInfo<'a> {
    /// Source file containing the failed check.
    pub file: &'a str,
    /// Path of the enclosing function.
    pub function: &'a str,
    /// Source line of the failed check.
    pub line: u32,
    /// Source text of the failed expression.
    pub expr: &'a str,
    /// Human-readable context message (empty when absent).
    pub message: String,
    /// Script-side call trace (empty when absent).
    pub script_trace: String,
    /// Native call trace (empty when absent).
    pub native_trace: String,
    /// Call-site suppression flag, armed by an "ignore always" resolution.
    ignore_always: Option<&'a AtomicBool>,
}

impl<'a> AssertInfo<'a> {
    /// Create an event for the given call site, with no message or traces.
    pub fn new(file: &'a str, function: &'a str, line: u32, expr: &'a str) -> Self {
        Self {
            file,
            function,
            line,
            expr,
            message: String::new(),
            script_trace: String::new(),
            native_trace: String::new(),
            ignore_always: None,
        }
    }

    /// Attach a context message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach a script-side call trace.
    pub fn with_script_trace(mut self, trace: impl Into<String>) -> Self {
        self.script_trace = trace.into();
        self
    }

    /// Attach a native call trace.
    pub fn with_native_trace(mut self, trace: impl Into<String>) -> Self {
        self.native_trace = trace.into();
        self
    }

    /// Attach the call site's suppression flag.
    pub fn with_ignore_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.ignore_always = Some(flag);
        self
    }

    /// Arm the call site's suppression flag, if one is attached.
    pub fn suppress(&self) {
        if let Some(flag) = self.ignore_always {
            flag.store(true, Ordering::Relaxed);
        }
    }

    /// Whether the call site's suppression flag is armed.
    pub fn is_suppressed(&self) -> bool {
        match self.ignore_always {
            Some(flag) => flag.load(Ordering::Relaxed),
            None => false,
        }
    }

    /// Deduplication fingerprint of the assertion site.
    ///
    /// A pure function of file, function, line and expression; messages and
    /// traces do not contribute. Empty location fields fall back to
    /// `nofile`, `nofunc` and `noexpr` so the key never collapses to
    /// whitespace.
    pub fn assert_key(&self) -> String {
        format!(
            "{} {} ({}): {}",
            or_fallback(self.file, "nofile"),
            or_fallback(self.function, "nofunc"),
            self.line,
            or_fallback(self.expr, "noexpr"),
        )
    }

    /// Deduplication fingerprint of the combined call traces.
    ///
    /// CRC32C over the script trace followed by the native trace, rendered
    /// in decimal. Depends only on the concatenated trace text.
    pub fn callstack_key(&self) -> String {
        let hash = crc32c::crc32c(self.script_trace.as_bytes());
        let hash = crc32c::crc32c_append(hash, self.native_trace.as_bytes());
        hash.to_string()
    }
}

fn or_fallback<'s>(value: &'s str, fallback: &'s str) -> &'s str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Capture the native call trace for an assertion event.
///
/// Honors the standard `RUST_BACKTRACE` environment controls; returns an
/// empty string when capture is disabled or unsupported.
pub fn capture_native_trace() -> String {
    let trace = Backtrace::capture();
    if trace.status() == BacktraceStatus::Captured {
        trace.to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_key_format() {
        let info = AssertInfo::new("a.cpp", "f", 42, "x>0");
        assert_eq!(info.assert_key(), "a.cpp f (42): x>0");
    }

    #[test]
    fn test_assert_key_ignores_message_and_traces() {
        let bare = AssertInfo::new("a.cpp", "f", 42, "x>0");
        let full = AssertInfo::new("a.cpp", "f", 42, "x>0")
            .with_message("x was -3")
            .with_script_trace("script.py:10")
            .with_native_trace("frame 0");
        assert_eq!(bare.assert_key(), full.assert_key());
    }

    #[test]
    fn test_assert_key_fallbacks() {
        let info = AssertInfo::new("", "", 7, "");
        assert_eq!(info.assert_key(), "nofile nofunc (7): noexpr");
    }

    #[test]
    fn test_callstack_key_depends_only_on_concatenation() {
        let a = AssertInfo::new("a.cpp", "f", 1, "x")
            .with_script_trace("ab")
            .with_native_trace("c");
        let b = AssertInfo::new("b.cpp", "g", 2, "y")
            .with_script_trace("a")
            .with_native_trace("bc");
        assert_eq!(a.callstack_key(), b.callstack_key());

        let c = AssertInfo::new("a.cpp", "f", 1, "x").with_script_trace("abd");
        assert_ne!(a.callstack_key(), c.callstack_key());
    }

    #[test]
    fn test_callstack_key_is_decimal() {
        let info = AssertInfo::new("a.cpp", "f", 1, "x").with_script_trace("trace");
        assert!(info.callstack_key().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_suppression_flag() {
        let flag = AtomicBool::new(false);
        let info = AssertInfo::new("a.cpp", "f", 1, "x").with_ignore_flag(&flag);
        assert!(!info.is_suppressed());
        info.suppress();
        assert!(info.is_suppressed());
        assert!(flag.load(Ordering::Relaxed));
    }

    #[test]
    fn test_suppress_without_flag_is_noop() {
        let info = AssertInfo::new("a.cpp", "f", 1, "x");
        info.suppress();
        assert!(!info.is_suppressed());
    }
}

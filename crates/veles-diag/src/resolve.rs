//! Interactive assertion resolution.

use std::io::{self, BufRead, Write};

use crate::AssertInfo;

/// Operator decision for a reported assertion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Trap into an attached debugger at the failure point.
    Break,
    /// Continue this time; the site stays armed.
    Ignore,
    /// Continue and suppress every future failure of this site.
    IgnoreAlways,
    /// Terminate the process with exit status 0.
    Exit,
}

/// Presentation surface for interactive assertion resolution.
///
/// The shipped game installs a dialog; tooling and tests install their own.
/// Implementations block the calling thread until the operator decides.
pub trait AssertPresenter: Send + Sync {
    /// Present `info` and return the operator's decision.
    fn present(&self, info: &AssertInfo<'_>) -> Resolution;
}

/// Terminal presenter reading the decision from standard input.
///
/// Unrecognized or absent input resolves to [`Resolution::Ignore`] so an
/// unattended run cannot wedge on the prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePresenter;

impl AssertPresenter for ConsolePresenter {
    fn present(&self, info: &AssertInfo<'_>) -> Resolution {
        {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "assertion failed: {}", info.expr);
            let _ = writeln!(out, "  at {} {} ({})", info.file, info.function, info.line);
            if !info.message.is_empty() {
                let _ = writeln!(out, "  {}", info.message);
            }
            if !info.script_trace.is_empty() {
                let _ = writeln!(out, "script trace:\n{}", info.script_trace);
            }
            if !info.native_trace.is_empty() {
                let _ = writeln!(out, "native trace:\n{}", info.native_trace);
            }
            let _ = write!(out, "[b]reak, [i]gnore, ignore [a]lways, e[x]it? ");
            let _ = out.flush();
        }

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return Resolution::Ignore;
        }
        match answer.trim().chars().next() {
            Some('b') | Some('B') => Resolution::Break,
            Some('a') | Some('A') => Resolution::IgnoreAlways,
            Some('x') | Some('X') => Resolution::Exit,
            _ => Resolution::Ignore,
        }
    }
}

/// Trap into an attached debugger, where the architecture supports it.
///
/// Without a debugger attached this raises the platform's trap signal,
/// which is the conventional outcome of an explicit break request.
pub fn debug_break() {
    #[cfg(target_arch = "x86_64")]
    unsafe {
        std::arch::asm!("int3");
    }
    #[cfg(target_arch = "x86")]
    unsafe {
        std::arch::asm!("int3");
    }
    #[cfg(target_arch = "aarch64")]
    unsafe {
        std::arch::asm!("brk #0");
    }
}

//! The process-wide diagnostics service.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use crate::sink::LogSinks;
use crate::{AssertInfo, AssertPresenter, Error, Resolution, Result};

/// Routing service for failed runtime invariants.
///
/// Constructed once at startup in one of two mutually exclusive modes:
/// logged (unattended builds append every report to the on-disk assertion
/// logs) or interactive (developer builds block on a presenter for a
/// decision). The mode is fixed for the service's lifetime.
pub struct Diagnostics {
    mode: Mode,
    prompting: AtomicBool,
}

enum Mode {
    Logged(LogSinks),
    Interactive(Box<dyn AssertPresenter>),
}

impl Diagnostics {
    /// Unattended mode: append every report to `Asserts.log` and
    /// `AssertsJson.log` under `dir`.
    pub fn logged<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Ok(Self {
            mode: Mode::Logged(LogSinks::open(dir.as_ref())?),
            prompting: AtomicBool::new(false),
        })
    }

    /// Interactive mode: route every report through `presenter`.
    pub fn interactive(presenter: impl AssertPresenter + 'static) -> Self {
        Self {
            mode: Mode::Interactive(Box::new(presenter)),
            prompting: AtomicBool::new(false),
        }
    }

    /// Record a failed assertion and decide how execution continues.
    ///
    /// Logged mode appends to both sinks and resolves to
    /// [`Resolution::Ignore`]. Interactive mode blocks on the presenter:
    /// `IgnoreAlways` additionally arms the event's suppression flag,
    /// `Break` traps into the debugger and `Exit` terminates the process
    /// with status 0. A report raised while the prompt is already open
    /// resolves to `Ignore` without a second prompt.
    pub fn report_assertion(&self, info: &AssertInfo<'_>) -> Resolution {
        match &self.mode {
            Mode::Logged(sinks) => {
                sinks.append(info);
                Resolution::Ignore
            }
            Mode::Interactive(presenter) => {
                if self.prompting.swap(true, Ordering::Acquire) {
                    return Resolution::Ignore;
                }
                let resolution = {
                    let _guard = PromptGuard(&self.prompting);
                    presenter.present(info)
                };
                match resolution {
                    Resolution::Break => crate::debug_break(),
                    Resolution::IgnoreAlways => info.suppress(),
                    Resolution::Exit => std::process::exit(0),
                    Resolution::Ignore => {}
                }
                resolution
            }
        }
    }

    /// Record a failed ensure invariant and build the failure the caller
    /// must propagate. Continuing past a failed ensure is not sound.
    pub fn report_ensure_failure(&self, info: &AssertInfo<'_>) -> Error {
        self.report_assertion(info);
        Error::ensure_failed(info.expr)
    }

    /// Record a recoverable error. Reported like an assertion, never
    /// propagated.
    pub fn report_error(&self, info: &AssertInfo<'_>) {
        self.report_assertion(info);
    }

    /// Record an unrecoverable failure and terminate.
    ///
    /// The failure is surfaced through the active mode first, then the
    /// process aborts rather than continue in a corrupted state.
    pub fn report_fatal(&self, error: &dyn std::error::Error) -> ! {
        let text = error.to_string();
        let info = AssertInfo::new("", "", 0, &text).with_message("fatal");
        self.report_assertion(&info);
        std::process::abort();
    }
}

/// Clears the prompt-open flag when the presenter returns or panics.
struct PromptGuard<'a>(&'a AtomicBool);

impl Drop for PromptGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

static GLOBAL: OnceLock<Diagnostics> = OnceLock::new();

/// Install the process-wide diagnostics service consumed by the assertion
/// macros. At most one service can be installed per process.
pub fn install(diagnostics: Diagnostics) -> Result<()> {
    GLOBAL
        .set(diagnostics)
        .map_err(|_| Error::AlreadyInstalled)
}

/// The installed process-wide diagnostics service, if any.
pub fn global() -> Option<&'static Diagnostics> {
    GLOBAL.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{ASSERT_JSON_LOG, ASSERT_LOG};
    use crate::AssertRecord;
    use parking_lot::Mutex;
    use std::path::PathBuf;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{mpsc, Arc};

    fn temp_log_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("veles-diag-{}-{}", tag, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    struct ScriptedPresenter {
        answer: Resolution,
        calls: Arc<AtomicUsize>,
    }

    impl AssertPresenter for ScriptedPresenter {
        fn present(&self, _info: &AssertInfo<'_>) -> Resolution {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
        }
    }

    #[test]
    fn test_logged_mode_appends_both_sinks() {
        let dir = temp_log_dir("both-sinks");
        let diagnostics = Diagnostics::logged(&dir).unwrap();

        let info = AssertInfo::new("a.cpp", "f", 42, "x>0")
            .with_message("x was -3")
            .with_script_trace("script.py:10")
            .with_native_trace("frame 0");
        assert_eq!(diagnostics.report_assertion(&info), Resolution::Ignore);

        let plain = std::fs::read_to_string(dir.join(ASSERT_LOG)).unwrap();
        assert!(plain.contains("a.cpp f (42): x>0,  x was -3"));
        assert!(plain.contains("script.py:10"));
        assert!(plain.contains("frame 0"));

        let json = std::fs::read_to_string(dir.join(ASSERT_JSON_LOG)).unwrap();
        let record: AssertRecord = serde_json::from_str(json.lines().next().unwrap()).unwrap();
        assert_eq!(record.file.as_deref(), Some("a.cpp"));
        assert_eq!(record.line, 42);
        assert_eq!(record.msg.as_deref(), Some("x was -3"));
        assert_eq!(record.assert_key, "a.cpp f (42): x>0");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_logged_mode_omits_absent_json_keys() {
        let dir = temp_log_dir("absent-keys");
        let diagnostics = Diagnostics::logged(&dir).unwrap();

        diagnostics.report_assertion(&AssertInfo::new("a.cpp", "f", 42, "x>0"));

        let json = std::fs::read_to_string(dir.join(ASSERT_JSON_LOG)).unwrap();
        let line = json.lines().next().unwrap();
        assert!(!line.contains("\"msg\""));
        assert!(!line.contains("\"py_trace\""));
        assert!(!line.contains("\"dll_trace\""));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_logged_mode_appends_one_line_per_report() {
        let dir = temp_log_dir("per-report");
        let diagnostics = Diagnostics::logged(&dir).unwrap();

        diagnostics.report_assertion(&AssertInfo::new("a.cpp", "f", 1, "x>0"));
        diagnostics.report_assertion(&AssertInfo::new("a.cpp", "f", 2, "y>0"));

        let json = std::fs::read_to_string(dir.join(ASSERT_JSON_LOG)).unwrap();
        assert_eq!(json.lines().count(), 2);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_report_ensure_failure_logs_and_returns_typed_error() {
        let dir = temp_log_dir("ensure");
        let diagnostics = Diagnostics::logged(&dir).unwrap();

        let info = AssertInfo::new("a.cpp", "f", 9, "count < limit");
        let error = diagnostics.report_ensure_failure(&info);
        match error {
            Error::EnsureFailed { expr } => assert_eq!(expr, "count < limit"),
            other => panic!("unexpected error: {other:?}"),
        }

        let json = std::fs::read_to_string(dir.join(ASSERT_JSON_LOG)).unwrap();
        assert_eq!(json.lines().count(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_report_error_is_recoverable() {
        let dir = temp_log_dir("error");
        let diagnostics = Diagnostics::logged(&dir).unwrap();

        diagnostics.report_error(&AssertInfo::new("a.cpp", "f", 3, "ptr.is_some()"));

        let plain = std::fs::read_to_string(dir.join(ASSERT_LOG)).unwrap();
        assert!(plain.contains("a.cpp f (3): ptr.is_some(),"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_interactive_ignore_always_arms_site_flag() {
        let calls = Arc::new(AtomicUsize::new(0));
        let diagnostics = Diagnostics::interactive(ScriptedPresenter {
            answer: Resolution::IgnoreAlways,
            calls: Arc::clone(&calls),
        });

        let flag = AtomicBool::new(false);
        let info = AssertInfo::new("a.cpp", "f", 1, "x>0").with_ignore_flag(&flag);
        assert_eq!(diagnostics.report_assertion(&info), Resolution::IgnoreAlways);
        assert!(flag.load(Ordering::Relaxed));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_interactive_ignore_leaves_site_flag_unarmed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let diagnostics = Diagnostics::interactive(ScriptedPresenter {
            answer: Resolution::Ignore,
            calls: Arc::clone(&calls),
        });

        let flag = AtomicBool::new(false);
        let info = AssertInfo::new("a.cpp", "f", 1, "x>0").with_ignore_flag(&flag);
        assert_eq!(diagnostics.report_assertion(&info), Resolution::Ignore);
        assert!(!flag.load(Ordering::Relaxed));
    }

    struct BlockingPresenter {
        entered: mpsc::Sender<()>,
        release: Mutex<mpsc::Receiver<()>>,
        calls: Arc<AtomicUsize>,
    }

    impl AssertPresenter for BlockingPresenter {
        fn present(&self, _info: &AssertInfo<'_>) -> Resolution {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.send(()).unwrap();
            self.release.lock().recv().unwrap();
            Resolution::Ignore
        }
    }

    #[test]
    fn test_nested_report_resolves_ignore_without_second_prompt() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let calls = Arc::new(AtomicUsize::new(0));
        let diagnostics = Diagnostics::interactive(BlockingPresenter {
            entered: entered_tx,
            release: Mutex::new(release_rx),
            calls: Arc::clone(&calls),
        });

        std::thread::scope(|scope| {
            let first = scope.spawn(|| {
                let info = AssertInfo::new("a.cpp", "f", 1, "x>0");
                diagnostics.report_assertion(&info)
            });

            // Wait for the prompt to open, then raise a second report.
            entered_rx.recv().unwrap();
            let nested = AssertInfo::new("b.cpp", "g", 2, "y>0");
            assert_eq!(diagnostics.report_assertion(&nested), Resolution::Ignore);
            assert_eq!(calls.load(Ordering::SeqCst), 1);

            release_tx.send(()).unwrap();
            assert_eq!(first.join().unwrap(), Resolution::Ignore);

            // The prompt must be usable again once the first report resolves.
            let second = scope.spawn(|| {
                let info = AssertInfo::new("c.cpp", "h", 3, "z>0");
                diagnostics.report_assertion(&info)
            });
            entered_rx.recv().unwrap();
            release_tx.send(()).unwrap();
            assert_eq!(second.join().unwrap(), Resolution::Ignore);
        });

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}

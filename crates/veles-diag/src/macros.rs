//! Call-site assertion macros.
//!
//! The macros capture the source location, the enclosing function path and
//! the expression text, then report through the installed process-wide
//! [`Diagnostics`](crate::Diagnostics) service. Each `veles_assert!` call
//! site carries its own static suppression flag, armed when the operator
//! resolves a failure with "ignore always".

/// Expands to the path of the enclosing function.
#[macro_export]
macro_rules! function_path {
    () => {{
        fn anchor() {}
        fn name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        name_of(anchor).trim_end_matches("::anchor")
    }};
}

/// Check a continuable runtime invariant.
///
/// On failure the event is reported through the installed diagnostics
/// service and execution continues unless the operator decides otherwise.
/// Without an installed service the check is a no-op. Suppressed sites
/// skip the report entirely, including trace capture.
///
/// ```no_run
/// # fn count_alive(units: &[u32]) -> usize { units.len() }
/// # let units: Vec<u32> = Vec::new();
/// veles_diag::veles_assert!(count_alive(&units) > 0, "all {} units culled", units.len());
/// ```
#[macro_export]
macro_rules! veles_assert {
    ($cond:expr $(,)?) => {
        $crate::veles_assert!($cond, "")
    };
    ($cond:expr, $($arg:tt)+) => {{
        if !($cond) {
            static IGNORE_ALWAYS: ::std::sync::atomic::AtomicBool =
                ::std::sync::atomic::AtomicBool::new(false);
            if !IGNORE_ALWAYS.load(::std::sync::atomic::Ordering::Relaxed) {
                if let Some(diagnostics) = $crate::global() {
                    let info = $crate::AssertInfo::new(
                        file!(),
                        $crate::function_path!(),
                        line!(),
                        stringify!($cond),
                    )
                    .with_message(format!($($arg)+))
                    .with_native_trace($crate::capture_native_trace())
                    .with_ignore_flag(&IGNORE_ALWAYS);
                    diagnostics.report_assertion(&info);
                }
            }
        }
    }};
}

/// Check an invariant the caller cannot continue past.
///
/// On failure the event is reported like [`veles_assert!`] and the
/// enclosing function returns the typed ensure failure, so the enclosing
/// function's error type must convert from
/// [`Error`](crate::Error). The failure is returned even when no
/// diagnostics service is installed; only the report is skipped.
///
/// ```no_run
/// fn advance_turn(turn: u32) -> veles_diag::Result<u32> {
///     veles_diag::veles_ensure!(turn < 10_000, "turn counter ran away: {}", turn);
///     Ok(turn + 1)
/// }
/// ```
#[macro_export]
macro_rules! veles_ensure {
    ($cond:expr $(,)?) => {
        $crate::veles_ensure!($cond, "")
    };
    ($cond:expr, $($arg:tt)+) => {
        if !($cond) {
            let info = $crate::AssertInfo::new(
                file!(),
                $crate::function_path!(),
                line!(),
                stringify!($cond),
            )
            .with_message(format!($($arg)+))
            .with_native_trace($crate::capture_native_trace());
            return Err(match $crate::global() {
                Some(diagnostics) => diagnostics.report_ensure_failure(&info).into(),
                None => $crate::Error::ensure_failed(info.expr).into(),
            });
        }
    };
}

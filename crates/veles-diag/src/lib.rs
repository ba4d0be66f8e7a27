//! Runtime invariant diagnostics for the Veles game SDK.
//!
//! Engine and mod code checks invariants with [`veles_assert!`] and
//! [`veles_ensure!`]. Failed checks become [`AssertInfo`] events routed
//! through the process-wide [`Diagnostics`] service, which either appends
//! them to the on-disk assertion logs (unattended builds) or presents them
//! for an interactive decision (developer builds).
//!
//! # Example
//!
//! ```no_run
//! use veles_diag::{install, Diagnostics};
//!
//! // Pick the operating mode once at startup.
//! install(Diagnostics::logged("Logs")?)?;
//!
//! fn rebuild_route_cache(stale: usize) {
//!     veles_diag::veles_assert!(stale < 64, "route cache fell {} updates behind", stale);
//! }
//! # Ok::<(), veles_diag::Error>(())
//! ```

mod error;
mod info;
mod macros;
mod reporter;
mod resolve;
mod sink;

pub use error::{Error, Result};
pub use info::{capture_native_trace, AssertInfo};
pub use reporter::{global, install, Diagnostics};
pub use resolve::{debug_break, AssertPresenter, ConsolePresenter, Resolution};
pub use sink::{AssertRecord, ASSERT_JSON_LOG, ASSERT_LOG};

//! Info record base types for XML-declared game data.
//!
//! Every data-driven record kind in the engine (units, buildings, techs,
//! promotions and so on) shares one declared core: an identity key, art
//! and localization references, and a graphical-only flag. [`InfoBase`]
//! holds that core together with per-record caches of resolved text;
//! concrete kinds compose it and expose it through the [`Info`] trait,
//! and [`InfoTable`] owns the records of one kind with stable indices
//! and identity lookup.
//!
//! # Example
//!
//! ```
//! use veles_infos::{Info, InfoBase, InfoSource, InfoTable, Result};
//!
//! struct UnitInfo {
//!     base: InfoBase,
//!     combat: i32,
//! }
//!
//! impl Info for UnitInfo {
//!     fn base(&self) -> &InfoBase {
//!         &self.base
//!     }
//!     fn base_mut(&mut self) -> &mut InfoBase {
//!         &mut self.base
//!     }
//! }
//!
//! impl UnitInfo {
//!     fn read(source: &dyn InfoSource) -> Result<Self> {
//!         let mut base = InfoBase::new();
//!         base.read(source)?;
//!         let combat = source
//!             .get_str("iCombat")
//!             .and_then(|v| v.parse().ok())
//!             .unwrap_or(0);
//!         Ok(Self { base, combat })
//!     }
//! }
//! # let _ = UnitInfo { base: InfoBase::from_type("UNIT_WARRIOR"), combat: 2 };
//! # let _: InfoTable<UnitInfo> = InfoTable::new();
//! ```

mod base;
mod error;
mod source;
mod table;
mod text;

pub use base::InfoBase;
pub use error::{Error, Result};
pub use source::InfoSource;
pub use table::{Info, InfoTable};
pub use text::{KeyEchoSource, TextSource};

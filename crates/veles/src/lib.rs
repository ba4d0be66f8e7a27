//! Veles - game data and diagnostics foundation library.
//!
//! This crate provides a unified interface to the Veles crate ecosystem
//! for building data-driven game engine extensions.
//!
//! # Crates
//!
//! - [`veles_diag`] - assertion reporting, resolution and on-disk logs
//! - [`veles_infos`] - info record base types, text caching and tables
//! - [`veles_xml`] - XML info loading and localized text tables
//!
//! # Example
//!
//! ```
//! use veles::prelude::*;
//!
//! let document = XmlDocument::parse(
//!     "<UnitInfos><UnitInfo><Type>UNIT_WARRIOR</Type></UnitInfo></UnitInfos>",
//! )?;
//!
//! let mut units: InfoTable<InfoBase> = InfoTable::new();
//! for element in document.root().children() {
//!     let mut info = InfoBase::new();
//!     info.read(&element)?;
//!     units.merge(info);
//! }
//!
//! let warrior = units.by_type("UNIT_WARRIOR").unwrap();
//! println!("{}", warrior.text(&KeyEchoSource));
//! # Ok::<(), veles::Error>(())
//! ```

use thiserror::Error;

// Re-export all sub-crates
pub use veles_diag as diag;
pub use veles_infos as infos;
pub use veles_xml as xml;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use veles_diag::{
        install, veles_assert, veles_ensure, AssertInfo, AssertPresenter, ConsolePresenter,
        Diagnostics, Resolution,
    };
    pub use veles_infos::{Info, InfoBase, InfoSource, InfoTable, KeyEchoSource, TextSource};
    pub use veles_xml::{Element, XmlDocument, XmlTextSource};
}

// Re-export commonly used types at the crate root
pub use veles_infos::{InfoBase, InfoTable};

/// Unified error type over the Veles sub-crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Diagnostics pipeline failure.
    #[error("{0}")]
    Diag(#[from] veles_diag::Error),

    /// Info record failure.
    #[error("{0}")]
    Infos(#[from] veles_infos::Error),

    /// XML load failure.
    #[error("{0}")]
    Xml(#[from] veles_xml::Error),
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

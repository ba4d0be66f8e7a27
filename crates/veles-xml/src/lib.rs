//! XML info loading and localized text tables for Veles.
//!
//! Game data ships as XML: info documents declare records field by field,
//! and text documents carry the TXT key translations those records
//! reference. This crate parses both into [`XmlDocument`] arenas, feeds
//! record reads through [`Element`] (which implements the loader's field
//! contract) and serves localization through [`XmlTextSource`].
//!
//! # Example
//!
//! ```
//! use veles_infos::{InfoBase, InfoTable};
//! use veles_xml::XmlDocument;
//!
//! let document = XmlDocument::parse(
//!     "<UnitInfos><UnitInfo><Type>UNIT_WARRIOR</Type></UnitInfo></UnitInfos>",
//! )?;
//!
//! let mut table: InfoTable<InfoBase> = InfoTable::new();
//! for element in document.root().children() {
//!     let mut info = InfoBase::new();
//!     info.read(&element)?;
//!     table.merge(info);
//! }
//! assert_eq!(table.index_of("UNIT_WARRIOR"), Some(0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod document;
mod error;
mod node;
mod text;

pub use document::XmlDocument;
pub use error::{Error, Result};
pub use node::Element;
pub use text::{XmlTextSource, DEFAULT_LANGUAGE};

#[cfg(test)]
mod tests {
    use super::*;
    use veles_infos::{InfoBase, InfoTable, TextSource};

    const BASE_XML: &str = r#"<UnitInfos>
        <UnitInfo>
            <Type>UNIT_DEFAULT</Type>
            <bGraphicalOnly>1</bGraphicalOnly>
            <Civilopedia>TXT_DEFAULT_UNIT</Civilopedia>
        </UnitInfo>
        <UnitInfo>
            <Type>UNIT_WARRIOR</Type>
            <Description>TXT_KEY_UNIT_WARRIOR</Description>
        </UnitInfo>
    </UnitInfos>"#;

    const MOD_XML: &str = r#"<UnitInfos>
        <UnitInfo>
            <Type>UNIT_WARRIOR</Type>
            <Description>TXT_KEY_UNIT_BERSERKER</Description>
        </UnitInfo>
        <UnitInfo>
            <Type>UNIT_SKIRMISHER</Type>
            <Description>TXT_KEY_UNIT_SKIRMISHER</Description>
        </UnitInfo>
    </UnitInfos>"#;

    fn load_into(table: &mut InfoTable<InfoBase>, xml: &str) {
        let document = XmlDocument::parse(xml).unwrap();
        for element in document.root().children() {
            let mut info = InfoBase::new();
            info.read(&element).unwrap();
            table.merge(info);
        }
    }

    #[test]
    fn test_modular_load_layers_documents() {
        let mut table = InfoTable::new();
        load_into(&mut table, BASE_XML);
        load_into(&mut table, MOD_XML);

        assert_eq!(table.len(), 3);
        assert_eq!(table.index_of("UNIT_WARRIOR"), Some(1));
        assert_eq!(table.index_of("UNIT_SKIRMISHER"), Some(2));

        let warrior = table.by_type("UNIT_WARRIOR").unwrap();
        assert_eq!(warrior.text_key(), "TXT_KEY_UNIT_BERSERKER");
    }

    #[test]
    fn test_merged_record_inherits_template_fields() {
        let mut table = InfoTable::new();
        load_into(&mut table, BASE_XML);

        let template = table.by_type("UNIT_DEFAULT").unwrap().clone();
        let mut warrior = table.by_type("UNIT_WARRIOR").unwrap().clone();
        warrior.copy_non_defaults(&template);

        assert_eq!(warrior.type_id(), Some("UNIT_WARRIOR"));
        assert_eq!(warrior.civilopedia_key(), "TXT_DEFAULT_UNIT");
        assert!(warrior.is_graphical_only());
    }

    #[test]
    fn test_records_resolve_text_through_loaded_tables() {
        let mut table = InfoTable::new();
        load_into(&mut table, BASE_XML);

        let mut texts = XmlTextSource::new("English");
        let document = XmlDocument::parse(
            r#"<GameText>
                <TEXT>
                    <Tag>TXT_KEY_UNIT_WARRIOR</Tag>
                    <English>warrior:warriors</English>
                </TEXT>
            </GameText>"#,
        )
        .unwrap();
        texts.load_document(&document);

        let warrior = table.by_type("UNIT_WARRIOR").unwrap();
        assert_eq!(warrior.text(&texts), "warrior");
        assert_eq!(warrior.description(&texts, 1), "warriors");
        // A key the tables do not carry echoes through unchanged.
        assert_eq!(warrior.civilopedia(&texts), "");
        assert_eq!(texts.object_text("TXT_MISSING", 0), "TXT_MISSING");
    }
}

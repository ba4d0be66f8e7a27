//! Element views over a parsed document.

use veles_diag::veles_assert;
use veles_infos::InfoSource;

use crate::document::XmlDocument;

/// A lightweight view of one element in a parsed document.
///
/// Copyable; borrows the owning [`XmlDocument`].
#[derive(Clone, Copy)]
pub struct Element<'a> {
    document: &'a XmlDocument,
    index: usize,
}

impl<'a> Element<'a> {
    pub(crate) fn new(document: &'a XmlDocument, index: usize) -> Self {
        Self { document, index }
    }

    /// Tag name of this element.
    pub fn tag(&self) -> &'a str {
        &self.document.node(self.index).tag
    }

    /// Text content of this element (empty when none).
    pub fn text(&self) -> &'a str {
        &self.document.node(self.index).text
    }

    /// Value of the named attribute.
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.document
            .node(self.index)
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate the direct child elements.
    pub fn children(&self) -> impl Iterator<Item = Element<'a>> + 'a {
        let document = self.document;
        document
            .node(self.index)
            .children
            .iter()
            .map(move |&index| Element::new(document, index))
    }

    /// The first direct child with the given tag.
    pub fn child_by_tag(&self, tag: &str) -> Option<Element<'a>> {
        self.children().find(|child| child.tag() == tag)
    }
}

impl std::fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag())
            .field("text", &self.text())
            .finish()
    }
}

/// Elements feed record reads directly: a field named `X` is the text of
/// the first child element tagged `X`.
impl InfoSource for Element<'_> {
    fn get_bool(&self, name: &str) -> Option<bool> {
        let child = self.child_by_tag(name)?;
        let parsed = parse_bool(child.text());
        veles_assert!(
            parsed.is_some(),
            "element {} under {} is not a boolean: {:?}",
            name,
            self.tag(),
            child.text()
        );
        parsed
    }

    fn get_str(&self, name: &str) -> Option<String> {
        self.child_by_tag(name).map(|child| child.text().to_string())
    }
}

/// Parse the schema's boolean notation (`0`/`1`, with `true`/`false`
/// tolerated).
fn parse_bool(text: &str) -> Option<bool> {
    match text.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::XmlDocument;

    fn unit_doc() -> XmlDocument {
        XmlDocument::parse(
            r#"<UnitInfo>
                <Type>UNIT_WARRIOR</Type>
                <bGraphicalOnly>1</bGraphicalOnly>
                <bFood>0</bFood>
                <bBroken>yes</bBroken>
                <Help></Help>
            </UnitInfo>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_get_str_reads_child_text() {
        let document = unit_doc();
        let unit = document.root();
        assert_eq!(unit.get_str("Type").as_deref(), Some("UNIT_WARRIOR"));
        assert_eq!(unit.get_str("Help").as_deref(), Some(""));
        assert_eq!(unit.get_str("Strategy"), None);
    }

    #[test]
    fn test_get_bool_parses_schema_notation() {
        let document = unit_doc();
        let unit = document.root();
        assert_eq!(unit.get_bool("bGraphicalOnly"), Some(true));
        assert_eq!(unit.get_bool("bFood"), Some(false));
        assert_eq!(unit.get_bool("bMissing"), None);
    }

    #[test]
    fn test_get_bool_rejects_garbage() {
        let document = unit_doc();
        assert_eq!(document.root().get_bool("bBroken"), None);
    }

    #[test]
    fn test_child_by_tag_returns_first_match() {
        let document =
            XmlDocument::parse("<Root><Entry>first</Entry><Entry>second</Entry></Root>").unwrap();
        let entry = document.root().child_by_tag("Entry").unwrap();
        assert_eq!(entry.text(), "first");
    }
}

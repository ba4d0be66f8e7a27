//! XML parsing into a flat element arena.

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{Element, Error, Result};

/// One parsed element: tag, text content, attributes and child links.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) tag: String,
    pub(crate) text: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) children: Vec<usize>,
}

/// A parsed XML document.
///
/// Elements live in a flat arena in document order and are addressed by
/// index; [`Element`] views borrow the document and are cheap to copy
/// around.
#[derive(Debug)]
pub struct XmlDocument {
    nodes: Vec<Node>,
    root: usize,
}

impl XmlDocument {
    /// Parse a document from XML text.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut nodes: Vec<Node> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut root: Option<usize> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let index = open_node(&mut nodes, &stack, &mut root, &e);
                    stack.push(index);
                }
                Ok(Event::Empty(e)) => {
                    open_node(&mut nodes, &stack, &mut root, &e);
                }
                Ok(Event::End(_)) => {
                    stack.pop();
                }
                Ok(Event::Text(e)) => {
                    if let Some(&index) = stack.last() {
                        let text = e.unescape().map_err(|e| Error::Xml(e.to_string()))?;
                        nodes[index].text.push_str(&text);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {} // declarations, comments, processing instructions
                Err(e) => return Err(Error::Xml(format!("XML parse error: {}", e))),
            }
        }

        match root {
            Some(root) => Ok(Self { nodes, root }),
            None => Err(Error::NoRoot),
        }
    }

    /// Parse a document from a file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(&xml)
    }

    /// The root element.
    pub fn root(&self) -> Element<'_> {
        Element::new(self, self.root)
    }

    /// Iterate every element in document order, root first.
    pub fn descendants(&self) -> impl Iterator<Item = Element<'_>> {
        (0..self.nodes.len()).map(move |index| Element::new(self, index))
    }

    pub(crate) fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }
}

fn open_node(
    nodes: &mut Vec<Node>,
    stack: &[usize],
    root: &mut Option<usize>,
    event: &BytesStart<'_>,
) -> usize {
    let tag = String::from_utf8_lossy(event.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in event.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = String::from_utf8_lossy(&attr.value).into_owned();
        attributes.push((key, value));
    }

    let index = nodes.len();
    nodes.push(Node {
        tag,
        text: String::new(),
        attributes,
        children: Vec::new(),
    });
    if let Some(&parent) = stack.last() {
        nodes[parent].children.push(index);
    } else if root.is_none() {
        *root = Some(index);
    }
    index
}

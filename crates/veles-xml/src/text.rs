//! Localized text tables loaded from game text XML.

use std::hash::BuildHasherDefault;
use std::path::Path;

use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;

use veles_infos::TextSource;

use crate::{Result, XmlDocument};

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Language used when an entry lacks the configured one.
pub const DEFAULT_LANGUAGE: &str = "English";

const TEXT_TAG: &str = "TEXT";
const KEY_TAG: &str = "Tag";

/// Localized text table, loaded from game text XML documents.
///
/// Each `TEXT` entry carries a `Tag` child naming the key, plus one child
/// per language. The value for the configured language is kept, falling
/// back to English when that language is missing. A value may pack
/// grammatical form variants separated by colons, e.g. `worker:workers`.
#[derive(Debug)]
pub struct XmlTextSource {
    language: String,
    entries: FxHashMap<String, String>,
}

impl XmlTextSource {
    /// Create an empty table selecting entries for `language`.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            entries: FxHashMap::default(),
        }
    }

    /// The language entries are selected for.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Number of loaded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load every `TEXT` entry from `document`, returning how many were
    /// added or replaced. Later loads override earlier ones, so load
    /// order follows mod layering order.
    pub fn load_document(&mut self, document: &XmlDocument) -> usize {
        let mut loaded = 0;
        for element in document.descendants() {
            if element.tag() != TEXT_TAG {
                continue;
            }
            let key = match element.child_by_tag(KEY_TAG) {
                Some(key) => key,
                None => continue,
            };
            let value = element
                .child_by_tag(&self.language)
                .or_else(|| element.child_by_tag(DEFAULT_LANGUAGE));
            let value = match value {
                Some(value) => value,
                None => continue,
            };
            self.entries
                .insert(key.text().to_string(), value.text().to_string());
            loaded += 1;
        }
        log::debug!("loaded {} text entries for {}", loaded, self.language);
        loaded
    }

    /// Load entries from a text XML file.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let document = XmlDocument::from_file(path)?;
        Ok(self.load_document(&document))
    }

    /// The raw entry for `key`, with all of its form variants.
    pub fn entry(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl TextSource for XmlTextSource {
    fn text(&self, key: &str) -> String {
        match self.entry(key) {
            Some(value) => form_variant(value, 0).to_string(),
            None => key.to_string(),
        }
    }

    fn object_text(&self, key: &str, form: u32) -> String {
        match self.entry(key) {
            Some(value) => form_variant(value, form).to_string(),
            None => key.to_string(),
        }
    }
}

/// Select a colon-separated form variant, clamping past-the-end requests
/// to the last declared variant.
fn form_variant(value: &str, form: u32) -> &str {
    let mut last = value;
    for (index, variant) in value.split(':').enumerate() {
        last = variant;
        if index as u32 == form {
            return variant;
        }
    }
    last
}

//! The record base every info kind composes.

use parking_lot::Mutex;

use crate::{InfoSource, Result, TextSource};

/// Declared state and cached text shared by every info record kind.
///
/// An unset string field is the empty string and an unset flag is `false`;
/// there is no separate "declared" bit, which is what gives
/// [`copy_non_defaults`](Self::copy_non_defaults) its layering rule.
/// Resolved text is cached per record under an interior lock, so lookups
/// take `&self` while staying memoized.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Default)]
pub struct InfoBase {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    ty: String,
    graphical_only: bool,
    button: String,
    text_key: String,
    civilopedia_key: String,
    help_key: String,
    strategy_key: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    cache: Mutex<TextCache>,
}

/// Lazily resolved text, keyed by the record's TXT tags.
#[derive(Debug, Clone, Default)]
struct TextCache {
    descriptions: Vec<String>,
    text: Option<String>,
    civilopedia: Option<String>,
    help: Option<String>,
    strategy: Option<String>,
}

impl Clone for InfoBase {
    fn clone(&self) -> Self {
        Self {
            ty: self.ty.clone(),
            graphical_only: self.graphical_only,
            button: self.button.clone(),
            text_key: self.text_key.clone(),
            civilopedia_key: self.civilopedia_key.clone(),
            help_key: self.help_key.clone(),
            strategy_key: self.strategy_key.clone(),
            cache: Mutex::new(self.cache.lock().clone()),
        }
    }
}

impl InfoBase {
    /// Create an uninitialized record; every field holds its unset value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record with only the identity key set.
    pub fn from_type(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            ..Self::default()
        }
    }

    /// Populate fields from a structured-data source.
    ///
    /// Every field is optional; fields absent from the source keep their
    /// current value, so repeated reads layer partial declarations. The
    /// base read always succeeds, the `Result` is the contract for
    /// composed record kinds whose own reads can fail.
    pub fn read(&mut self, source: &dyn InfoSource) -> Result<()> {
        if let Some(value) = source.get_bool("bGraphicalOnly") {
            self.graphical_only = value;
        }
        if let Some(value) = source.get_str("Type") {
            self.ty = value;
        }
        if let Some(value) = source.get_str("Description") {
            self.text_key = value;
        }
        if let Some(value) = source.get_str("Civilopedia") {
            self.civilopedia_key = value;
        }
        if let Some(value) = source.get_str("Help") {
            self.help_key = value;
        }
        if let Some(value) = source.get_str("Strategy") {
            self.strategy_key = value;
        }
        if let Some(value) = source.get_str("Button") {
            self.button = value;
        }
        Ok(())
    }

    /// Inherit unset fields from `template`.
    ///
    /// A field still holding its unset value (empty string, `false` for
    /// the graphical-only flag) takes the template's value; declared
    /// fields win, so this runs after [`read`](Self::read).
    ///
    /// The flag rule is asymmetric: a record declaring `bGraphicalOnly`
    /// as `0` still inherits a template's `1`, because a declared `false`
    /// is indistinguishable from "not declared".
    pub fn copy_non_defaults(&mut self, template: &InfoBase) {
        if !self.graphical_only {
            self.graphical_only = template.graphical_only;
        }
        if self.ty.is_empty() {
            self.ty = template.ty.clone();
        }
        if self.civilopedia_key.is_empty() {
            self.civilopedia_key = template.civilopedia_key.clone();
        }
        if self.help_key.is_empty() {
            self.help_key = template.help_key.clone();
        }
        if self.strategy_key.is_empty() {
            self.strategy_key = template.strategy_key.clone();
        }
        if self.button.is_empty() {
            self.button = template.button.clone();
        }
        if self.text_key.is_empty() {
            self.text_key = template.text_key.clone();
        }
    }

    /// The record's identity key, if one is set.
    pub fn type_id(&self) -> Option<&str> {
        if self.ty.is_empty() {
            None
        } else {
            Some(&self.ty)
        }
    }

    /// Whether the record is presentation-only and excluded from gameplay
    /// logic.
    pub fn is_graphical_only(&self) -> bool {
        self.graphical_only
    }

    /// Icon art path reference. Not a localization key.
    pub fn button(&self) -> &str {
        &self.button
    }

    /// TXT key of the display name and its description forms.
    pub fn text_key(&self) -> &str {
        &self.text_key
    }

    /// TXT key of the civilopedia entry.
    pub fn civilopedia_key(&self) -> &str {
        &self.civilopedia_key
    }

    /// TXT key of the hover help text.
    pub fn help_key(&self) -> &str {
        &self.help_key
    }

    /// TXT key of the strategy text.
    pub fn strategy_key(&self) -> &str {
        &self.strategy_key
    }

    /// The display name in the given grammatical form, resolved through
    /// `texts` on first access.
    ///
    /// The form cache grows append-only: a request for form `n` resolves
    /// every missing form up to `n` in increasing order, and no form is
    /// ever resolved twice.
    pub fn description(&self, texts: &dyn TextSource, form: u32) -> String {
        let mut cache = self.cache.lock();
        while cache.descriptions.len() <= form as usize {
            let next = cache.descriptions.len() as u32;
            let resolved = texts.object_text(&self.text_key, next);
            cache.descriptions.push(resolved);
        }
        cache.descriptions[form as usize].clone()
    }

    /// The singular display name, resolved through `texts` on first
    /// access.
    pub fn text(&self, texts: &dyn TextSource) -> String {
        let mut cache = self.cache.lock();
        cache
            .text
            .get_or_insert_with(|| texts.text(&self.text_key))
            .clone()
    }

    /// The civilopedia entry text, resolved on first access.
    pub fn civilopedia(&self, texts: &dyn TextSource) -> String {
        let mut cache = self.cache.lock();
        cache
            .civilopedia
            .get_or_insert_with(|| texts.text(&self.civilopedia_key))
            .clone()
    }

    /// The hover help text, resolved on first access.
    pub fn help(&self, texts: &dyn TextSource) -> String {
        let mut cache = self.cache.lock();
        cache
            .help
            .get_or_insert_with(|| texts.text(&self.help_key))
            .clone()
    }

    /// The strategy text, resolved on first access.
    pub fn strategy(&self, texts: &dyn TextSource) -> String {
        let mut cache = self.cache.lock();
        cache
            .strategy
            .get_or_insert_with(|| texts.text(&self.strategy_key))
            .clone()
    }

    /// Drop every cached text without touching the declared keys.
    ///
    /// The next access re-resolves through the provider. Called when the
    /// active localization changes.
    pub fn reset(&self) {
        let mut cache = self.cache.lock();
        cache.descriptions.clear();
        cache.text = None;
        cache.civilopedia = None;
        cache.help = None;
        cache.strategy = None;
    }
}

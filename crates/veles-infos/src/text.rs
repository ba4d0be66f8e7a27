//! Localized text resolution.

/// Provider of localized strings keyed by TXT tags.
///
/// Implementations must return the same text for a fixed key, form and
/// active localization; record caches memoize on that contract and only
/// re-resolve after an explicit reset.
pub trait TextSource {
    /// Resolve the localized text for `key`.
    fn text(&self, key: &str) -> String;

    /// Resolve the localized text for `key` in the given grammatical form
    /// (plural or gender variant).
    fn object_text(&self, key: &str, form: u32) -> String;
}

/// Fallback provider that resolves every key to itself.
///
/// Mirrors the engine's behavior when localization data is missing: the
/// raw TXT key is displayed rather than nothing, which keeps the gap
/// visible and attributable.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyEchoSource;

impl TextSource for KeyEchoSource {
    fn text(&self, key: &str) -> String {
        key.to_string()
    }

    fn object_text(&self, key: &str, _form: u32) -> String {
        key.to_string()
    }
}

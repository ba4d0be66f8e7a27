//! Structured-data loader contract.

/// Field access over one record's structured-data node.
///
/// Loaders pull optional fields by schema name; `None` means the field is
/// simply not declared, which is never an error. Absent fields leave the
/// record's current value in place, so partial declarations layer.
pub trait InfoSource {
    /// Get a boolean field by name.
    fn get_bool(&self, name: &str) -> Option<bool>;

    /// Get a string field by name.
    fn get_str(&self, name: &str) -> Option<String>;
}

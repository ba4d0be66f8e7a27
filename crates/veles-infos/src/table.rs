//! Info tables: ownership, identity lookup and modular merge.

use std::hash::BuildHasherDefault;

use hashbrown::HashMap as FastHashMap;
use rustc_hash::FxHasher;

use veles_diag::veles_assert;

use crate::InfoBase;

type FxHashMap<K, V> = FastHashMap<K, V, BuildHasherDefault<FxHasher>>;

/// Capability every concrete info record kind exposes.
///
/// Record kinds compose an [`InfoBase`] rather than inherit from it; the
/// table and loader layers reach the shared state through this trait.
pub trait Info {
    /// The shared base state.
    fn base(&self) -> &InfoBase;

    /// Mutable access to the shared base state.
    fn base_mut(&mut self) -> &mut InfoBase;
}

impl Info for InfoBase {
    fn base(&self) -> &InfoBase {
        self
    }

    fn base_mut(&mut self) -> &mut InfoBase {
        self
    }
}

/// Owning table of one record kind, indexed by position and identity key.
///
/// Indices are stable for the table's lifetime; cross-references between
/// records store indices instead of identity strings.
#[derive(Debug)]
pub struct InfoTable<T> {
    entries: Vec<T>,
    by_type: FxHashMap<String, usize>,
}

impl<T> Default for InfoTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InfoTable<T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_type: FxHashMap::default(),
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The record at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    /// Iterate records in index order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Index of the record with the given identity key.
    pub fn index_of(&self, ty: &str) -> Option<usize> {
        self.by_type.get(ty).copied()
    }

    /// The record with the given identity key.
    pub fn by_type(&self, ty: &str) -> Option<&T> {
        self.index_of(ty).and_then(|index| self.entries.get(index))
    }
}

impl<T: Info> InfoTable<T> {
    /// Append a record, indexing it by identity key when one is set.
    ///
    /// Re-declaring an existing key this way is reported as a recoverable
    /// diagnostic and the later record takes over the lookup;
    /// [`merge`](Self::merge) is the sanctioned path for layered
    /// re-declaration.
    pub fn push(&mut self, info: T) -> usize {
        let index = self.entries.len();
        if let Some(ty) = info.base().type_id() {
            let previous = self.by_type.insert(ty.to_string(), index);
            veles_assert!(previous.is_none(), "duplicate info type {}", ty);
        }
        self.entries.push(info);
        index
    }

    /// Insert a record, layering it over any existing record with the same
    /// identity key.
    ///
    /// The incoming record's unset fields inherit from the incumbent via
    /// [`InfoBase::copy_non_defaults`], then it replaces the incumbent at
    /// the same index, so stored cross-references stay valid. Records with
    /// no identity key, or with a previously unseen one, are appended.
    pub fn merge(&mut self, mut info: T) -> usize {
        let existing = info
            .base()
            .type_id()
            .and_then(|ty| self.by_type.get(ty).copied());
        match existing {
            Some(index) => {
                log::debug!(
                    "merging re-declared info type {} at index {}",
                    info.base().type_id().unwrap_or(""),
                    index
                );
                info.base_mut().copy_non_defaults(self.entries[index].base());
                self.entries[index] = info;
                index
            }
            None => self.push(info),
        }
    }

    /// Drop every record's cached text. Called when the active
    /// localization changes.
    pub fn reset_text_caches(&self) {
        for entry in &self.entries {
            entry.base().reset();
        }
    }
}

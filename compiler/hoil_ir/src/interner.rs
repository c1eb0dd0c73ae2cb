//! String interner for identifier storage.
//!
//! Every variable, function and capability name in a HOIL program is interned
//! once. Names are handed out in insertion order, so the first string interned
//! after construction gets index 1 (index 0 is the empty string).

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

struct InternTable {
    /// Map from string content to index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name::index`.
    strings: Vec<&'static str>,
}

impl InternTable {
    fn with_empty() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, 0);
        InternTable {
            map,
            strings: vec![empty],
        }
    }
}

/// String interner with O(1) lookup in both directions.
///
/// Strings are leaked to obtain a `'static` lifetime; a process interprets one
/// program, so the table never needs to shrink.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    pub fn new() -> Self {
        StringInterner {
            table: RwLock::new(InternTable::with_empty()),
        }
    }

    /// Intern a string, returning its `Name`.
    pub fn intern(&self, s: &str) -> Name {
        // Fast path: already interned
        if let Some(&index) = self.table.read().map.get(s) {
            return Name::new(index);
        }

        let mut guard = self.table.write();
        if let Some(&index) = guard.map.get(s) {
            return Name::new(index);
        }

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        // Saturates at u32::MAX
        let index = u32::try_from(guard.strings.len()).unwrap_or(u32::MAX);
        guard.strings.push(leaked);
        guard.map.insert(leaked, index);
        Name::new(index)
    }

    /// Look up an already-interned string without inserting it.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.table.read().map.get(s).map(|&index| Name::new(index))
    }

    /// Look up the string for a `Name`.
    ///
    /// Unknown names resolve to the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Always false: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;

//! Union tag interning.
//!
//! A union value carries the tag of the concrete type it currently holds in
//! its `ptr` header. Tags are small integers assigned on first use to each
//! fully qualified (and unaliased) type name, so the same type always gets
//! the same tag within a module and tags compare by value.
//!
//! Ids start at 1. A zeroed union header reads as null and matches no type.

use rustc_hash::FxHashMap;

#[derive(Default)]
pub struct TagRegistry {
    ids: FxHashMap<String, u32>,
    names: Vec<String>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tag of `fq_name`, assigning the next free one if needed.
    pub fn intern(&mut self, fq_name: &str) -> u32 {
        if let Some(&id) = self.ids.get(fq_name) {
            return id;
        }
        self.names.push(fq_name.to_owned());
        #[allow(clippy::cast_possible_truncation, reason = "one tag per program type")]
        let id = self.names.len() as u32;
        self.ids.insert(fq_name.to_owned(), id);
        tracing::trace!(name = fq_name, id, "interned union tag");
        id
    }

    pub fn lookup(&self, fq_name: &str) -> Option<u32> {
        self.ids.get(fq_name).copied()
    }

    /// Type name behind a tag, for diagnostics.
    pub fn name_of(&self, id: u32) -> Option<&str> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests;

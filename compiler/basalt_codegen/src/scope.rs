//! Storage tracking for named objects during lowering.
//!
//! `TranslationScope` pairs the type checker's [`RawScope`] (name → unique
//! declaration id, with shadowing) with a storage map (unique id → stack
//! slot). Name resolution goes through the raw scope first, so shadowed and
//! sibling declarations of the same name never collide in the storage map.
//!
//! Frames are cheap: `nested()` clones the raw scope in O(1) thanks to its
//! `im::HashMap`, and every frame of one callable body shares a single
//! storage map.

use std::cell::RefCell;
use std::rc::Rc;

use basalt_ir::{DebugInfo, ObjectKind, RawScope, ScopeKind, TypeSignature};
use rustc_hash::FxHashMap;

use crate::error::{InternalError, LowerResult};
use crate::value_id::{LLVMTypeId, ValueId};

/// Where a named object lives: a stack slot and the IR type stored there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StorageHandle {
    pub address: ValueId,
    pub layout: LLVMTypeId,
}

#[derive(Clone)]
pub struct TranslationScope {
    raw: RawScope,
    storage: Rc<RefCell<FxHashMap<String, StorageHandle>>>,
}

impl TranslationScope {
    /// A root frame over `raw`, with an empty storage map.
    pub fn new(raw: RawScope) -> Self {
        Self {
            raw,
            storage: Rc::new(RefCell::new(FxHashMap::default())),
        }
    }

    pub fn raw(&self) -> &RawScope {
        &self.raw
    }

    /// A child frame: shadowing declarations stay local to it, storage is
    /// shared with the parent.
    #[must_use]
    pub fn nested(&self, kind: ScopeKind) -> Self {
        Self {
            raw: self.raw.nested(kind),
            storage: Rc::clone(&self.storage),
        }
    }

    /// Declare a local variable or constant and bind its storage.
    ///
    /// Returns the declaration's unique id.
    pub fn declare(
        &mut self,
        identifier: &str,
        ty: TypeSignature,
        kind: ObjectKind,
        debug: &DebugInfo,
        handle: StorageHandle,
    ) -> String {
        let unique_id = match kind {
            ObjectKind::Constant => self.raw.store_local_constant(identifier, ty, debug),
            ObjectKind::Variable => self.raw.store_local_variable(identifier, ty, debug),
            ObjectKind::Argument => {
                let unique_id = format!("{}/ARG:{identifier}", debug.unique_string_id());
                self.raw.store_argument(identifier, ty, unique_id.clone());
                unique_id
            }
        };
        self.bind(unique_id.clone(), handle);
        unique_id
    }

    /// Bind storage to an argument the raw scope already knows about.
    pub fn bind_argument(&mut self, identifier: &str, handle: StorageHandle) -> LowerResult<String> {
        let unique_id = self
            .raw
            .resolve_object_unique_id(identifier)
            .ok_or_else(|| InternalError::UnresolvedIdentifier {
                name: identifier.to_owned(),
            })?
            .to_owned();
        self.bind(unique_id.clone(), handle);
        Ok(unique_id)
    }

    fn bind(&mut self, unique_id: String, handle: StorageHandle) {
        tracing::trace!(%unique_id, ?handle, "bound storage");
        self.storage.borrow_mut().insert(unique_id, handle);
    }

    /// Storage of the object `identifier` currently refers to.
    pub fn resolve_storage(&self, identifier: &str) -> LowerResult<StorageHandle> {
        let unresolved = || InternalError::UnresolvedIdentifier {
            name: identifier.to_owned(),
        };
        let unique_id = self
            .raw
            .resolve_object_unique_id(identifier)
            .ok_or_else(unresolved)?;
        self.storage
            .borrow()
            .get(unique_id)
            .copied()
            .ok_or_else(unresolved)
    }

    pub fn object_type(&self, identifier: &str) -> Option<&TypeSignature> {
        self.raw.object_type(identifier)
    }
}

#[cfg(test)]
mod tests;

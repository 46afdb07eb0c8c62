//! The result of lowering an expression.

use crate::ir_builder::IrBuilder;
use crate::value_id::ValueId;

/// A lowered expression: its value, and where it lives if it is a place.
///
/// Places (identifiers, fields, elements, dereferences) carry the address
/// they were loaded from. Pure values (literals, arithmetic, call results)
/// carry none until an operation that needs an address materializes one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TranslatedExpression {
    pub value: ValueId,
    pub address: Option<ValueId>,
}

impl TranslatedExpression {
    /// A pure value without storage.
    pub fn value(value: ValueId) -> Self {
        Self {
            value,
            address: None,
        }
    }

    /// A value loaded from `address`.
    pub fn place(value: ValueId, address: ValueId) -> Self {
        Self {
            value,
            address: Some(address),
        }
    }

    pub fn is_place(&self) -> bool {
        self.address.is_some()
    }

    /// The address of this expression, spilling the value into a fresh
    /// stack slot when it has none.
    pub fn address_or_materialize(&self, builder: &mut IrBuilder<'_, '_>, name: &str) -> ValueId {
        if let Some(address) = self.address {
            return address;
        }
        let ty = builder.value_type(self.value);
        let slot = builder.alloca(ty, name);
        builder.store(self.value, slot);
        slot
    }

    /// Like [`address_or_materialize`](Self::address_or_materialize), but
    /// returns the expression as a place.
    #[must_use]
    pub fn materialize(self, builder: &mut IrBuilder<'_, '_>, name: &str) -> Self {
        let address = self.address_or_materialize(builder, name);
        Self::place(self.value, address)
    }
}

//! Rules for memory access: local slots, global pointers and stores,
//! atomics, kernel arguments and external pointers.

use super::{promoted_type, CastPosition, Checked, Fatal, TypeChecker, TypeError};
use crate::ir::{StmtId, StmtKind};
use crate::storage::SNodeId;
use crate::types::VectorType;

impl TypeChecker<'_> {
    fn require_scalar(&self, id: StmtId, what: &'static str) -> Checked {
        let width = self.ir.ret_type(id).width;
        if width != 1 {
            return Err(Fatal::new(id, TypeError::NonScalar { what, width }));
        }
        Ok(())
    }

    /// Point a store-like instruction at a converted value.
    fn redirect_value(&mut self, id: StmtId, to: StmtId) {
        match &mut self.ir.stmt_mut(id).kind {
            StmtKind::LocalStore { value, .. }
            | StmtKind::GlobalStore { value, .. }
            | StmtKind::Atomic { value, .. } => *value = to,
            _ => {}
        }
    }

    pub(super) fn check_atomic(&mut self, id: StmtId, dest: StmtId, value: StmtId) -> Checked {
        self.require_scalar(id, "atomic operation")?;
        let dest_dt = self.ir.data_type(dest);
        let value_dt = self.ir.data_type(value);
        // The result is the value held at `dest` before the update.
        self.ir.set_ret_type(id, VectorType::scalar(dest_dt));
        if value_dt != dest_dt {
            self.precision_loss(id, "atomic operation", dest_dt, value_dt)?;
            let cast = self.insert_cast(id, value, dest_dt, CastPosition::Before);
            self.redirect_value(id, cast);
        }
        Ok(())
    }

    pub(super) fn check_local_load(&mut self, id: StmtId, slot: StmtId) -> Checked {
        self.require_scalar(id, "local load")?;
        let slot_type = self.ir.ret_type(slot);
        self.ir.set_ret_type(id, slot_type);
        Ok(())
    }

    pub(super) fn check_local_store(&mut self, id: StmtId, slot: StmtId, value: StmtId) -> Checked {
        if self.ir.data_type(slot).is_unknown() {
            let value_type = self.ir.ret_type(value);
            self.ir.set_ret_type(slot, value_type);
            tracing::debug!(slot = %slot, store = %id, "slot adopts {}", value_type);
            self.ir.set_ret_type(id, value_type);
            return Ok(());
        }
        let slot_type = self.ir.ret_type(slot);
        self.ir.set_ret_type(id, slot_type);
        let value_dt = self.ir.data_type(value);
        if value_dt != slot_type.data_type {
            let cast = self.insert_cast(id, value, slot_type.data_type, CastPosition::Before);
            self.redirect_value(id, cast);
        }
        if promoted_type(slot_type.data_type, value_dt) != slot_type.data_type {
            self.precision_loss(id, "local store", slot_type.data_type, value_dt)?;
        }
        Ok(())
    }

    pub(super) fn check_global_store(&mut self, id: StmtId, ptr: StmtId, value: StmtId) -> Checked {
        let ptr_type = self.ir.ret_type(ptr);
        self.ir.set_ret_type(id, ptr_type);
        let ptr_dt = ptr_type.data_type;
        let value_dt = self.ir.data_type(value);
        if value_dt != ptr_dt {
            let cast = self.insert_cast(id, value, ptr_dt, CastPosition::Before);
            self.redirect_value(id, cast);
        }
        if promoted_type(ptr_dt, value_dt) != ptr_dt {
            self.precision_loss(id, "global store", ptr_dt, value_dt)?;
        }
        Ok(())
    }

    pub(super) fn check_global_ptr(
        &mut self,
        id: StmtId,
        snodes: &[SNodeId],
        indices: &[StmtId],
    ) -> Checked {
        let storage = self.ctx.storage;
        let Some(&first) = snodes.first() else {
            return Err(Fatal::new(id, TypeError::NoStorageNodes));
        };
        self.ir.stmt_mut(id).ret_type.data_type = storage.data_type(first);

        for &snode in snodes {
            let Some(parent) = storage.parent(snode) else {
                continue;
            };
            let arity = storage.index_arity(parent);
            if arity != 0 && arity != indices.len() {
                return Err(Fatal::new(
                    id,
                    TypeError::IndexArity {
                        node: storage.kind_name(parent),
                        expected: arity,
                        found: indices.len(),
                    },
                ));
            }
        }

        for (position, &index) in indices.iter().enumerate() {
            let index_type = self.ir.ret_type(index);
            if !index_type.data_type.is_integral() {
                return Err(Fatal::new(
                    id,
                    TypeError::NonIntegralIndex {
                        position,
                        data_type: index_type.data_type,
                    },
                ));
            }
            if index_type.width as usize != snodes.len() {
                return Err(Fatal::new(
                    id,
                    TypeError::IndexWidth {
                        position,
                        width: index_type.width,
                        expected: snodes.len(),
                    },
                ));
            }
        }
        Ok(())
    }

    pub(super) fn check_arg_load(&mut self, id: StmtId, arg: usize) -> Checked {
        let signature = self.ctx.signature;
        let Some(slot) = signature.get(arg) else {
            return Err(Fatal::new(
                id,
                TypeError::ArgOutOfRange {
                    arg,
                    count: signature.len(),
                },
            ));
        };
        if slot.is_return_value {
            return Err(Fatal::new(id, TypeError::LoadFromReturnSlot { arg }));
        }
        self.ir.set_ret_type(id, VectorType::scalar(slot.data_type));
        Ok(())
    }

    pub(super) fn check_arg_store(&mut self, id: StmtId, arg: usize, value: StmtId) -> Checked {
        let signature = self.ctx.signature;
        let Some(slot) = signature.get(arg) else {
            return Err(Fatal::new(
                id,
                TypeError::ArgOutOfRange {
                    arg,
                    count: signature.len(),
                },
            ));
        };
        if !slot.is_return_value {
            return Err(Fatal::new(id, TypeError::StoreToParameter { arg }));
        }
        let found = self.ir.data_type(value);
        if found != slot.data_type {
            return Err(Fatal::new(
                id,
                TypeError::ReturnTypeMismatch {
                    arg,
                    expected: slot.data_type,
                    found,
                },
            ));
        }
        self.ir.set_ret_type(id, VectorType::scalar(slot.data_type));
        Ok(())
    }

    /// One lane per base pointer, typed like the first.
    pub(super) fn check_external_ptr(&mut self, id: StmtId, base_ptrs: &[StmtId]) -> Checked {
        let Some(&first) = base_ptrs.first() else {
            return Err(Fatal::new(id, TypeError::NoBasePointers));
        };
        let data_type = self.ir.data_type(first);
        self.ir
            .set_ret_type(id, VectorType::new(base_ptrs.len() as u32, data_type));
        Ok(())
    }
}

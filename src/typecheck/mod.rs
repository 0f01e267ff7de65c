//! Type checking and type inference over kernel IR.
//!
//! A single depth-first pass over the root block assigns every instruction a
//! result type, inserts value-preserving casts where operand types disagree,
//! and validates tensor-access and operator-domain rules. Three outcomes per
//! problem:
//!
//! - silent fix: an untyped local slot adopts the type of its first store;
//! - warning: an implicit conversion may lose precision (cast still inserted);
//! - fatal: the pass stops and returns a [`TypeCheckFailure`].

mod cast;
mod error;
mod memory;
mod ops;
mod promote;
#[cfg(test)]
mod tests;

pub use error::{TypeCheckFailure, TypeCheckReport, TypeError};
pub use promote::promoted_type;

pub(crate) use cast::CastPosition;

use crate::config::{CompileConfig, NarrowingPolicy};
use crate::diagnostic::Diagnostic;
use crate::ir::display::stmt_text;
use crate::ir::{BlockId, Ir, StmtId, StmtKind};
use crate::kernel::KernelSignature;
use crate::storage::StorageTree;
use crate::types::{DataType, VectorType};

/// Immutable inputs shared by every rule.
#[derive(Clone, Copy)]
pub struct CheckContext<'a> {
    pub config: &'a CompileConfig,
    pub signature: &'a KernelSignature,
    pub storage: &'a dyn StorageTree,
}

/// A fatal error raised by a rule at a given instruction.
#[derive(Debug)]
pub(crate) struct Fatal {
    stmt: StmtId,
    error: TypeError,
}

impl Fatal {
    pub(crate) fn new(stmt: StmtId, error: TypeError) -> Self {
        Self { stmt, error }
    }
}

pub(crate) type Checked = Result<(), Fatal>;

pub(crate) struct TypeChecker<'a> {
    pub(super) ir: &'a mut Ir,
    pub(super) ctx: CheckContext<'a>,
    /// Non-fatal diagnostics, in emission order.
    pub(super) warnings: Vec<Diagnostic>,
    pub(super) casts_inserted: usize,
}

/// Type check `ir` in place.
///
/// On failure the IR may already hold some inserted casts and result types;
/// it must not be passed on to later stages.
pub fn typecheck(ir: &mut Ir, ctx: CheckContext<'_>) -> Result<TypeCheckReport, TypeCheckFailure> {
    TypeChecker::new(ir, ctx).run()
}

impl<'a> TypeChecker<'a> {
    pub(crate) fn new(ir: &'a mut Ir, ctx: CheckContext<'a>) -> Self {
        Self {
            ir,
            ctx,
            warnings: Vec::new(),
            casts_inserted: 0,
        }
    }

    pub(crate) fn run(mut self) -> Result<TypeCheckReport, TypeCheckFailure> {
        let root = self.ir.root();
        let outcome = self.visit_block(root).and_then(|()| {
            if self.ctx.config.verify_totality {
                self.verify_totality()
            } else {
                Ok(())
            }
        });
        match outcome {
            Ok(()) => {
                tracing::debug!(
                    warnings = self.warnings.len(),
                    casts = self.casts_inserted,
                    "type check finished"
                );
                Ok(TypeCheckReport {
                    warnings: self.warnings,
                    casts_inserted: self.casts_inserted,
                })
            }
            Err(fatal) => Err(self.fail(fatal)),
        }
    }

    fn fail(self, fatal: Fatal) -> TypeCheckFailure {
        let span = self.ir.stmt(fatal.stmt).span;
        let text = stmt_text(self.ir, fatal.stmt);
        tracing::error!(stmt = %fatal.stmt, span = %span, "{} in `{}`", fatal.error, text);
        TypeCheckFailure {
            stmt: fatal.stmt,
            span,
            error: fatal.error,
            stmt_text: text,
            warnings: self.warnings,
        }
    }

    // --- Traversal ---

    pub(super) fn visit_block(&mut self, block: BlockId) -> Checked {
        // Casts spliced into this block while it is walked are typed by the
        // synthesizer; walking a snapshot keeps them from being revisited.
        let stmts = self.ir.block(block).stmts.clone();
        for id in stmts {
            self.visit(id)?;
        }
        Ok(())
    }

    fn visit_opt_block(&mut self, block: Option<BlockId>) -> Checked {
        match block {
            Some(block) => self.visit_block(block),
            None => Ok(()),
        }
    }

    fn visit(&mut self, id: StmtId) -> Checked {
        match self.ir.stmt(id).kind.clone() {
            // Slots are typed by their first store; constants arrive typed.
            StmtKind::Alloca | StmtKind::Const { .. } => Ok(()),
            StmtKind::If {
                true_block,
                false_block,
                ..
            } => {
                self.visit_opt_block(true_block)?;
                self.visit_opt_block(false_block)
            }
            StmtKind::RangeFor { begin, end, body } => {
                self.mark_as_if_const(begin, VectorType::scalar(DataType::I32));
                self.mark_as_if_const(end, VectorType::scalar(DataType::I32));
                self.visit_block(body)
            }
            StmtKind::StructFor { body, .. } | StmtKind::While { body } => self.visit_block(body),
            StmtKind::Offloaded { body, .. } => self.visit_opt_block(body),
            StmtKind::LocalLoad { slot } => self.check_local_load(id, slot),
            StmtKind::LocalStore { slot, value } => self.check_local_store(id, slot, value),
            StmtKind::GlobalLoad { ptr } => {
                let ty = self.ir.ret_type(ptr);
                self.ir.set_ret_type(id, ty);
                Ok(())
            }
            StmtKind::GlobalStore { ptr, value } => self.check_global_store(id, ptr, value),
            StmtKind::Atomic { dest, value, .. } => self.check_atomic(id, dest, value),
            StmtKind::GlobalPtr { snodes, indices } => self.check_global_ptr(id, &snodes, &indices),
            StmtKind::SNodeOp { .. } | StmtKind::LoopIndex { .. } => {
                self.ir.set_ret_type(id, VectorType::scalar(DataType::I32));
                Ok(())
            }
            StmtKind::Unary { op, operand } => self.check_unary(id, op, operand),
            StmtKind::Binary { op, lhs, rhs } => self.check_binary(id, op, lhs, rhs),
            StmtKind::Ternary { op, op1, op2, op3 } => self.check_ternary(id, op, op1, op2, op3),
            StmtKind::ElementShuffle { elements } => self.check_shuffle(id, &elements),
            StmtKind::RangeAssumption { input, base, .. } => {
                self.check_range_assumption(id, input, base)
            }
            StmtKind::ArgLoad { arg } => self.check_arg_load(id, arg),
            StmtKind::ArgStore { arg, value } => self.check_arg_store(id, arg, value),
            StmtKind::ExternalPtr { base_ptrs, .. } => self.check_external_ptr(id, &base_ptrs),
            StmtKind::GetCh { output_snode, .. } => {
                let dt = self.ctx.storage.data_type(output_snode);
                self.ir.set_ret_type(id, VectorType::scalar(dt));
                Ok(())
            }
        }
    }

    fn mark_as_if_const(&mut self, id: StmtId, ty: VectorType) {
        if self.ir.stmt(id).is_const() {
            self.ir.set_ret_type(id, ty);
        }
    }

    /// Every value read by a reachable instruction must be typed by now.
    fn verify_totality(&self) -> Checked {
        for consumer in self.ir.reachable() {
            for operand in typed_operands(&self.ir.stmt(consumer).kind) {
                if self.ir.data_type(operand).is_unknown() {
                    return Err(Fatal::new(consumer, TypeError::Unresolved { stmt: operand }));
                }
            }
        }
        Ok(())
    }

    // --- Diagnostics ---

    pub(super) fn warn(&mut self, id: StmtId, message: String) {
        let span = self.ir.stmt(id).span;
        tracing::warn!(stmt = %id, span = %span, "{}", message);
        let diag = Diagnostic::warning(message, span)
            .with_stmt(id)
            .with_note(format!("in `{}`", stmt_text(self.ir, id)));
        self.warnings.push(diag);
    }

    /// Report a conversion of `value` into `target` that may lose precision.
    /// Fatal only for a real narrowing under `NarrowingPolicy::Deny`.
    pub(super) fn precision_loss(
        &mut self,
        id: StmtId,
        what: &'static str,
        target: DataType,
        value: DataType,
    ) -> Checked {
        let error = TypeError::PrecisionLoss {
            what,
            target,
            value,
        };
        let narrowing = promoted_type(target, value) != target;
        if narrowing && self.ctx.config.narrowing == NarrowingPolicy::Deny {
            return Err(Fatal::new(id, error));
        }
        self.warn(id, error.to_string());
        Ok(())
    }
}

/// Operands that must carry a concrete element type. Pointers handed to
/// storage operations are typed by their node and may address a container.
fn typed_operands(kind: &StmtKind) -> Vec<StmtId> {
    match kind {
        StmtKind::SNodeOp { value, .. } => value.iter().copied().collect(),
        StmtKind::GetCh { .. } => Vec::new(),
        other => other.operands(),
    }
}

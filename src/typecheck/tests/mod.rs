mod basics;

use crate::config::CompileConfig;
use crate::ir::{Ir, StmtId, StmtKind};
use crate::kernel::KernelSignature;
use crate::storage::SNodeTree;
use crate::typecheck::{typecheck, CheckContext, TypeCheckFailure, TypeCheckReport, TypeError};

pub(super) fn check_with(
    ir: &mut Ir,
    config: &CompileConfig,
    signature: &KernelSignature,
    storage: &SNodeTree,
) -> Result<TypeCheckReport, TypeCheckFailure> {
    let ctx = CheckContext {
        config,
        signature,
        storage,
    };
    typecheck(ir, ctx)
}

pub(super) fn check(ir: &mut Ir) -> Result<TypeCheckReport, TypeCheckFailure> {
    check_with(
        ir,
        &CompileConfig::default(),
        &KernelSignature::new(),
        &SNodeTree::new(),
    )
}

pub(super) fn check_err(ir: &mut Ir) -> TypeError {
    match check(ir) {
        Ok(report) => panic!("expected a type error, got {:?}", report),
        Err(failure) => failure.error,
    }
}

/// Operands of a binary instruction after the pass.
pub(super) fn binary_operands(ir: &Ir, id: StmtId) -> (StmtId, StmtId) {
    match ir.stmt(id).kind {
        StmtKind::Binary { lhs, rhs, .. } => (lhs, rhs),
        ref other => panic!("expected binary, got {}", other.name()),
    }
}

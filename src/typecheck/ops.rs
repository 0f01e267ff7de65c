//! Rules for value operators: unary, binary, ternary, shuffle and range
//! assumptions.

use super::{promoted_type, CastPosition, Checked, Fatal, TypeChecker, TypeError};
use crate::ir::{BinaryOp, StmtId, StmtKind, TernaryOp, UnaryOp, VectorElement};
use crate::types::{DataType, VectorType};

/// Result type of a unary operator: the operand's, except that a cast
/// overrides the element type.
pub(crate) fn unary_result_type(op: UnaryOp, operand: VectorType) -> VectorType {
    match op {
        UnaryOp::Cast { to, .. } => VectorType::new(operand.width, to),
        _ => operand,
    }
}

impl TypeChecker<'_> {
    pub(super) fn check_unary(&mut self, id: StmtId, op: UnaryOp, operand: StmtId) -> Checked {
        let operand_type = self.ir.ret_type(operand);
        if op.requires_real() && !operand_type.data_type.is_real() {
            return Err(Fatal::new(
                id,
                TypeError::RealOnly {
                    op,
                    data_type: operand_type.data_type,
                },
            ));
        }
        self.ir.set_ret_type(id, unary_result_type(op, operand_type));
        Ok(())
    }

    pub(super) fn check_binary(
        &mut self,
        id: StmtId,
        op: BinaryOp,
        lhs: StmtId,
        rhs: StmtId,
    ) -> Checked {
        if self.ir.data_type(lhs).is_unknown() && self.ir.data_type(rhs).is_unknown() {
            return Err(Fatal::new(id, TypeError::AmbiguousOperands { op }));
        }

        let original = op;
        let (mut op, mut lhs, mut rhs) = (op, lhs, rhs);
        match op {
            BinaryOp::FloorDiv => {
                let ip = self.ctx.config.default_ip;
                lhs = self.coerce_operand(lhs, ip, DataType::is_integral);
                rhs = self.coerce_operand(rhs, ip, DataType::is_integral);
                op = BinaryOp::Div;
            }
            BinaryOp::TrueDiv => {
                let fp = self.ctx.config.default_fp;
                lhs = self.coerce_operand(lhs, fp, DataType::is_real);
                rhs = self.coerce_operand(rhs, fp, DataType::is_real);
                op = BinaryOp::Div;
            }
            _ => {}
        }
        if op != original {
            tracing::debug!(stmt = %id, "lowered {} to {}", original, op);
        }

        let (lhs_dt, rhs_dt) = (self.ir.data_type(lhs), self.ir.data_type(rhs));
        if lhs_dt != rhs_dt {
            let promoted = promoted_type(lhs_dt, rhs_dt);
            if lhs_dt != promoted {
                lhs = self.insert_cast(id, lhs, promoted, CastPosition::Before);
            }
            if rhs_dt != promoted {
                rhs = self.insert_cast(id, rhs, promoted, CastPosition::Before);
            }
        }
        if let StmtKind::Binary {
            op: stmt_op,
            lhs: stmt_lhs,
            rhs: stmt_rhs,
        } = &mut self.ir.stmt_mut(id).kind
        {
            *stmt_op = op;
            *stmt_lhs = lhs;
            *stmt_rhs = rhs;
        }

        let (lhs_type, rhs_type) = (self.ir.ret_type(lhs), self.ir.ret_type(rhs));
        if lhs_type.width != rhs_type.width
            || lhs_type.is_unknown()
            || rhs_type.is_unknown()
            || lhs_type != rhs_type
        {
            return Err(Fatal::new(
                id,
                TypeError::OperandMismatch {
                    lhs: lhs_type,
                    rhs: rhs_type,
                },
            ));
        }
        if op.is_bitwise() && !lhs_type.data_type.is_integral() {
            return Err(Fatal::new(
                id,
                TypeError::BitwiseNonIntegral {
                    op,
                    data_type: lhs_type.data_type,
                },
            ));
        }

        let result = if op.is_comparison() {
            VectorType::new(lhs_type.width, DataType::I32)
        } else {
            lhs_type
        };
        self.ir.set_ret_type(id, result);
        Ok(())
    }

    /// Division lowering: convert `operand` to `to` unless `accept` already
    /// holds for its element type. The cast follows the operand.
    fn coerce_operand(
        &mut self,
        operand: StmtId,
        to: DataType,
        accept: fn(DataType) -> bool,
    ) -> StmtId {
        if accept(self.ir.data_type(operand)) {
            operand
        } else {
            self.insert_cast(operand, operand, to, CastPosition::After)
        }
    }

    pub(super) fn check_ternary(
        &mut self,
        id: StmtId,
        op: TernaryOp,
        cond: StmtId,
        on_true: StmtId,
        on_false: StmtId,
    ) -> Checked {
        match op {
            TernaryOp::Select => {}
            TernaryOp::Ifte => return Err(Fatal::new(id, TypeError::UnsupportedTernary { op })),
        }
        let cond_type = self.ir.ret_type(cond);
        let true_type = self.ir.ret_type(on_true);
        let false_type = self.ir.ret_type(on_false);
        if cond_type.data_type != DataType::I32 {
            return Err(Fatal::new(
                id,
                TypeError::SelectCondition {
                    data_type: cond_type.data_type,
                },
            ));
        }
        if cond_type.width != true_type.width || true_type.width != false_type.width {
            return Err(Fatal::new(
                id,
                TypeError::SelectWidth {
                    cond: cond_type.width,
                    on_true: true_type.width,
                    on_false: false_type.width,
                },
            ));
        }

        let promoted = promoted_type(true_type.data_type, false_type.data_type);
        let (mut on_true, mut on_false) = (on_true, on_false);
        if true_type.data_type != promoted {
            on_true = self.insert_cast(id, on_true, promoted, CastPosition::Before);
        }
        if false_type.data_type != promoted {
            on_false = self.insert_cast(id, on_false, promoted, CastPosition::Before);
        }
        if let StmtKind::Ternary { op2, op3, .. } = &mut self.ir.stmt_mut(id).kind {
            *op2 = on_true;
            *op3 = on_false;
        }
        self.ir
            .set_ret_type(id, VectorType::new(cond_type.width, promoted));
        Ok(())
    }

    /// Only the element type follows the first source; the width is the
    /// lane count fixed when the shuffle was built.
    pub(super) fn check_shuffle(&mut self, id: StmtId, elements: &[VectorElement]) -> Checked {
        let Some(first) = elements.first() else {
            return Err(Fatal::new(id, TypeError::EmptyShuffle));
        };
        let data_type = self.ir.data_type(first.stmt);
        self.ir.stmt_mut(id).ret_type.data_type = data_type;
        Ok(())
    }

    pub(super) fn check_range_assumption(
        &mut self,
        id: StmtId,
        input: StmtId,
        base: StmtId,
    ) -> Checked {
        let (input_type, base_type) = (self.ir.ret_type(input), self.ir.ret_type(base));
        if input_type != base_type {
            return Err(Fatal::new(
                id,
                TypeError::RangeAssumptionMismatch {
                    input: input_type,
                    base: base_type,
                },
            ));
        }
        self.ir.set_ret_type(id, input_type);
        Ok(())
    }
}

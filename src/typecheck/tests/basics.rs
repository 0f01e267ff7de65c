//! Per-rule tests: result types, inserted casts and fatal errors.

use crate::config::CompileConfig;
use crate::ir::builder::IrBuilder;
use crate::ir::{BinaryOp, StmtKind, TernaryOp, UnaryOp, VectorElement};
use crate::kernel::KernelSignature;
use crate::storage::SNodeTree;
use crate::typecheck::TypeError;
use crate::types::{DataType, VectorType};

use super::{binary_operands, check, check_err, check_with};

fn scalar(dt: DataType) -> VectorType {
    VectorType::scalar(dt)
}

#[test]
fn test_add_int_and_float_casts_int() {
    let mut b = IrBuilder::new();
    let x = b.const_i32(1);
    let y = b.const_f32(2.0);
    let add = b.binary(BinaryOp::Add, x, y);
    let mut ir = b.finish();

    let report = check(&mut ir).unwrap();
    assert_eq!(report.casts_inserted, 1);
    assert!(report.warnings.is_empty());
    assert_eq!(ir.ret_type(add), scalar(DataType::F32));

    let casts = ir.casts();
    assert_eq!(casts.len(), 1);
    let (lhs, rhs) = binary_operands(&ir, add);
    assert_eq!(lhs, casts[0]);
    assert_eq!(rhs, y);
    assert_eq!(
        ir.stmt(lhs).kind,
        StmtKind::Unary {
            op: UnaryOp::Cast {
                to: DataType::F32,
                by_value: true
            },
            operand: x
        }
    );
    assert_eq!(ir.block(ir.root()).stmts, vec![x, y, lhs, add]);
}

#[test]
fn test_same_types_need_no_cast() {
    let mut b = IrBuilder::new();
    let x = b.const_f64(1.0);
    let y = b.const_f64(2.0);
    let mul = b.binary(BinaryOp::Mul, x, y);
    let mut ir = b.finish();

    let report = check(&mut ir).unwrap();
    assert_eq!(report.casts_inserted, 0);
    assert_eq!(ir.ret_type(mul), scalar(DataType::F64));
}

#[test]
fn test_comparison_yields_i32_flag() {
    let mut b = IrBuilder::new();
    let x = b.const_f32(1.0);
    let y = b.const_f64(2.0);
    let lt = b.binary(BinaryOp::CmpLt, x, y);
    let mut ir = b.finish();

    check(&mut ir).unwrap();
    assert_eq!(ir.ret_type(lt), scalar(DataType::I32));
    let (lhs, rhs) = binary_operands(&ir, lt);
    assert_eq!(ir.data_type(lhs), DataType::F64);
    assert_eq!(rhs, y);
}

#[test]
fn test_floordiv_of_integers_becomes_div() {
    let mut b = IrBuilder::new();
    let x = b.const_i32(7);
    let y = b.const_i32(2);
    let div = b.binary(BinaryOp::FloorDiv, x, y);
    let mut ir = b.finish();

    let report = check(&mut ir).unwrap();
    assert_eq!(report.casts_inserted, 0);
    assert_eq!(ir.ret_type(div), scalar(DataType::I32));
    let StmtKind::Binary { op, .. } = ir.stmt(div).kind else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::Div);
}

#[test]
fn test_floordiv_coerces_float_operand_after_it() {
    let mut b = IrBuilder::new();
    let x = b.const_f32(7.5);
    let y = b.const_i32(2);
    let div = b.binary(BinaryOp::FloorDiv, x, y);
    let mut ir = b.finish();

    let report = check(&mut ir).unwrap();
    assert_eq!(report.casts_inserted, 1);
    let (lhs, rhs) = binary_operands(&ir, div);
    assert_eq!(ir.block(ir.root()).stmts, vec![x, lhs, y, div]);
    assert_eq!(ir.data_type(lhs), DataType::I32);
    assert_eq!(rhs, y);
    assert_eq!(ir.ret_type(div), scalar(DataType::I32));
}

#[test]
fn test_floordiv_uses_configured_integer_type() {
    let mut b = IrBuilder::new();
    let x = b.const_f64(7.5);
    let y = b.const_f64(2.0);
    let div = b.binary(BinaryOp::FloorDiv, x, y);
    let mut ir = b.finish();

    let config = CompileConfig::default().with_default_ip(DataType::I64);
    let report = check_with(&mut ir, &config, &KernelSignature::new(), &SNodeTree::new()).unwrap();
    assert_eq!(report.casts_inserted, 2);
    assert_eq!(ir.ret_type(div), scalar(DataType::I64));
}

#[test]
fn test_truediv_coerces_integers_to_default_fp() {
    let mut b = IrBuilder::new();
    let x = b.const_i32(1);
    let y = b.const_i32(3);
    let div = b.binary(BinaryOp::TrueDiv, x, y);
    let mut ir = b.finish();

    let report = check(&mut ir).unwrap();
    assert_eq!(report.casts_inserted, 2);
    assert_eq!(ir.ret_type(div), scalar(DataType::F32));
    let StmtKind::Binary { op, .. } = ir.stmt(div).kind else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::Div);
}

#[test]
fn test_both_operands_unknown_is_ambiguous() {
    let mut b = IrBuilder::new();
    let x = b.alloca();
    let y = b.alloca();
    let lx = b.local_load(x);
    let ly = b.local_load(y);
    b.binary(BinaryOp::Add, lx, ly);
    let mut ir = b.finish();

    assert_eq!(
        check_err(&mut ir),
        TypeError::AmbiguousOperands { op: BinaryOp::Add }
    );
}

#[test]
fn test_one_unknown_operand_adopts_other_type() {
    let mut b = IrBuilder::new();
    let slot = b.alloca();
    let loaded = b.local_load(slot);
    let y = b.const_f32(1.0);
    let add = b.binary(BinaryOp::Add, loaded, y);
    let mut ir = b.finish();

    // The slot is never written, so the load stays untyped until the cast.
    let config = CompileConfig::default().with_verify_totality(false);
    check_with(&mut ir, &config, &KernelSignature::new(), &SNodeTree::new()).unwrap();
    assert_eq!(ir.ret_type(add), scalar(DataType::F32));
    let (lhs, _) = binary_operands(&ir, add);
    assert_ne!(lhs, loaded);
    assert_eq!(ir.data_type(lhs), DataType::F32);
}

#[test]
fn test_width_mismatch_is_fatal() {
    let mut b = IrBuilder::new();
    let x = b.const_f32(1.0);
    let y = b.const_f32(2.0);
    b.typed(y, VectorType::new(4, DataType::F32));
    b.binary(BinaryOp::Add, x, y);
    let mut ir = b.finish();

    assert_eq!(
        check_err(&mut ir),
        TypeError::OperandMismatch {
            lhs: scalar(DataType::F32),
            rhs: VectorType::new(4, DataType::F32),
        }
    );
}

#[test]
fn test_bitwise_on_floats_is_fatal() {
    let mut b = IrBuilder::new();
    let x = b.const_f32(1.0);
    let y = b.const_i32(2);
    b.binary(BinaryOp::BitAnd, x, y);
    let mut ir = b.finish();

    assert_eq!(
        check_err(&mut ir),
        TypeError::BitwiseNonIntegral {
            op: BinaryOp::BitAnd,
            data_type: DataType::F32,
        }
    );
}

#[test]
fn test_bitwise_on_mixed_integers_promotes() {
    let mut b = IrBuilder::new();
    let x = b.const_i32(1);
    let y = b.const_i64(2);
    let or = b.binary(BinaryOp::BitOr, x, y);
    let mut ir = b.finish();

    check(&mut ir).unwrap();
    assert_eq!(ir.ret_type(or), scalar(DataType::I64));
}

#[test]
fn test_unary_keeps_operand_type() {
    let mut b = IrBuilder::new();
    let x = b.const_f64(4.0);
    let root = b.unary(UnaryOp::Sqrt, x);
    let neg = b.unary(UnaryOp::Neg, root);
    let mut ir = b.finish();

    check(&mut ir).unwrap();
    assert_eq!(ir.ret_type(neg), scalar(DataType::F64));
}

#[test]
fn test_explicit_cast_overrides_type() {
    let mut b = IrBuilder::new();
    let x = b.const_f32(4.0);
    let c = b.cast(x, DataType::I16);
    let mut ir = b.finish();

    let report = check(&mut ir).unwrap();
    assert_eq!(report.casts_inserted, 0);
    assert_eq!(ir.ret_type(c), scalar(DataType::I16));
}

#[test]
fn test_trig_on_integer_is_fatal() {
    let mut b = IrBuilder::new();
    let x = b.const_i32(1);
    b.unary(UnaryOp::Sin, x);
    let mut ir = b.finish();

    assert_eq!(
        check_err(&mut ir),
        TypeError::RealOnly {
            op: UnaryOp::Sin,
            data_type: DataType::I32,
        }
    );
}

#[test]
fn test_floor_on_integer_is_fatal() {
    let mut b = IrBuilder::new();
    let x = b.const_i64(1);
    b.unary(UnaryOp::Floor, x);
    let mut ir = b.finish();

    assert!(matches!(
        check_err(&mut ir),
        TypeError::RealOnly {
            op: UnaryOp::Floor,
            ..
        }
    ));
}

#[test]
fn test_select_promotes_branches() {
    let mut b = IrBuilder::new();
    let cond = b.const_i32(1);
    let t = b.const_i32(3);
    let f = b.const_f64(4.0);
    let sel = b.select(cond, t, f);
    let mut ir = b.finish();

    let report = check(&mut ir).unwrap();
    assert_eq!(report.casts_inserted, 1);
    assert_eq!(ir.ret_type(sel), scalar(DataType::F64));
    let StmtKind::Ternary { op2, op3, .. } = ir.stmt(sel).kind else {
        panic!("expected ternary");
    };
    assert_eq!(ir.data_type(op2), ir.data_type(op3));
    assert_eq!(op3, f);
}

#[test]
fn test_select_with_float_condition_is_fatal() {
    let mut b = IrBuilder::new();
    let cond = b.const_f32(1.0);
    let t = b.const_i32(3);
    let f = b.const_f64(4.0);
    b.select(cond, t, f);
    let mut ir = b.finish();

    assert_eq!(
        check_err(&mut ir),
        TypeError::SelectCondition {
            data_type: DataType::F32
        }
    );
    assert!(ir.casts().is_empty());
}

#[test]
fn test_select_width_mismatch_is_fatal() {
    let mut b = IrBuilder::new();
    let cond = b.const_i32(1);
    let t = b.const_f32(3.0);
    let f = b.const_f32(4.0);
    b.typed(f, VectorType::new(2, DataType::F32));
    b.select(cond, t, f);
    let mut ir = b.finish();

    assert_eq!(
        check_err(&mut ir),
        TypeError::SelectWidth {
            cond: 1,
            on_true: 1,
            on_false: 2,
        }
    );
}

#[test]
fn test_other_ternary_is_unsupported() {
    let mut b = IrBuilder::new();
    let a = b.const_i32(1);
    b.ternary(TernaryOp::Ifte, a, a, a);
    let mut ir = b.finish();

    assert_eq!(
        check_err(&mut ir),
        TypeError::UnsupportedTernary {
            op: TernaryOp::Ifte
        }
    );
}

#[test]
fn test_shuffle_copies_first_element_type() {
    let mut b = IrBuilder::new();
    let v = b.const_f32(1.0);
    b.typed(v, VectorType::new(4, DataType::F32));
    let sh = b.shuffle(vec![
        VectorElement { stmt: v, index: 3 },
        VectorElement { stmt: v, index: 0 },
    ]);
    b.typed(sh, VectorType::new(2, DataType::Unknown));
    let mut ir = b.finish();

    check(&mut ir).unwrap();
    assert_eq!(ir.ret_type(sh), VectorType::new(2, DataType::F32));
}

#[test]
fn test_empty_shuffle_is_fatal() {
    let mut b = IrBuilder::new();
    b.shuffle(Vec::new());
    let mut ir = b.finish();

    assert_eq!(check_err(&mut ir), TypeError::EmptyShuffle);
}

#[test]
fn test_range_assumption_requires_matching_types() {
    let mut b = IrBuilder::new();
    let input = b.const_i32(5);
    let base = b.const_i32(0);
    let ok = b.assume_in_range(input, base, 0, 8);
    let mut ir = b.finish();
    check(&mut ir).unwrap();
    assert_eq!(ir.ret_type(ok), scalar(DataType::I32));

    let mut b = IrBuilder::new();
    let input = b.const_i32(5);
    let base = b.const_i64(0);
    b.assume_in_range(input, base, 0, 8);
    let mut ir = b.finish();
    assert_eq!(
        check_err(&mut ir),
        TypeError::RangeAssumptionMismatch {
            input: scalar(DataType::I32),
            base: scalar(DataType::I64),
        }
    );
}

use crate::diagnostic::Diagnostic;
use crate::ir::{BinaryOp, StmtId, TernaryOp, UnaryOp};
use crate::span::Span;
use crate::types::{DataType, VectorType};

/// Type errors that abort the pass.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("type mismatch (left = {lhs}, right = {rhs})")]
    OperandMismatch { lhs: VectorType, rhs: VectorType },

    #[error("cannot infer operand types of `{op}`: both operands are unknown")]
    AmbiguousOperands { op: BinaryOp },

    #[error("bitwise operation `{op}` can only apply to integral types, got {data_type}")]
    BitwiseNonIntegral { op: BinaryOp, data_type: DataType },

    #[error("`{op}` takes real inputs only, got {data_type}")]
    RealOnly { op: UnaryOp, data_type: DataType },

    #[error("{node} has {expected} indices, indexed with {found}")]
    IndexArity {
        node: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("tensors must be accessed with integral indices, index {position} is {data_type}")]
    NonIntegralIndex { position: usize, data_type: DataType },

    #[error("index {position} has width {width}, expected {expected}")]
    IndexWidth {
        position: usize,
        width: u32,
        expected: usize,
    },

    #[error("global pointer addresses no storage node")]
    NoStorageNodes,

    #[error("select condition must be i32, got {data_type}")]
    SelectCondition { data_type: DataType },

    #[error("select operands must share vector width (condition x{cond}, true x{on_true}, false x{on_false})")]
    SelectWidth {
        cond: u32,
        on_true: u32,
        on_false: u32,
    },

    #[error("ternary operator `{op}` is not implemented")]
    UnsupportedTernary { op: TernaryOp },

    #[error("{what} requires vector width 1, got {width}")]
    NonScalar { what: &'static str, width: u32 },

    #[error("element shuffle has no source elements")]
    EmptyShuffle,

    #[error("external pointer has no base pointers")]
    NoBasePointers,

    #[error("range assumption input ({input}) does not match its bound ({base})")]
    RangeAssumptionMismatch { input: VectorType, base: VectorType },

    #[error("argument {arg} out of range (kernel takes {count})")]
    ArgOutOfRange { arg: usize, count: usize },

    #[error("argument {arg} is a return value and cannot be loaded")]
    LoadFromReturnSlot { arg: usize },

    #[error("argument {arg} is not a return value and cannot be stored to")]
    StoreToParameter { arg: usize },

    #[error("return value {arg} is declared {expected}, stored {found}")]
    ReturnTypeMismatch {
        arg: usize,
        expected: DataType,
        found: DataType,
    },

    #[error("{what} may lose precision: {target} <- {value}")]
    PrecisionLoss {
        what: &'static str,
        target: DataType,
        value: DataType,
    },

    #[error("type of {stmt} could not be inferred")]
    Unresolved { stmt: StmtId },
}

impl TypeError {
    pub fn help(&self) -> Option<String> {
        match self {
            TypeError::NonIntegralIndex { .. } => Some(
                "cast the index to an integer (e.g. i32); note that floor on a float still \
                 returns a float"
                    .to_string(),
            ),
            TypeError::BitwiseNonIntegral { .. } => {
                Some("cast both operands to an integer type first".to_string())
            }
            TypeError::RealOnly { .. } => {
                Some("cast the operand to a floating-point type first".to_string())
            }
            TypeError::PrecisionLoss { .. } => Some(
                "add an explicit cast, or set typecheck.narrowing = \"warn\"".to_string(),
            ),
            TypeError::AmbiguousOperands { .. } | TypeError::Unresolved { .. } => Some(
                "the value is never assigned a typed value before it is used".to_string(),
            ),
            _ => None,
        }
    }
}

/// A fatal type error with the instruction it was raised at.
///
/// No part of the IR should be handed to later stages once this is returned.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{stmt} at {span}: {error}")]
pub struct TypeCheckFailure {
    pub stmt: StmtId,
    pub span: Span,
    #[source]
    pub error: TypeError,
    /// The offending instruction as printed IR.
    pub stmt_text: String,
    /// Warnings emitted before the failure.
    pub warnings: Vec<Diagnostic>,
}

impl TypeCheckFailure {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.error.to_string(), self.span)
            .with_stmt(self.stmt)
            .with_note(format!("in `{}`", self.stmt_text));
        if let Some(help) = self.error.help() {
            diag = diag.with_help(help);
        }
        diag
    }

    /// The failure followed by earlier warnings, in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut all = self.warnings.clone();
        all.push(self.to_diagnostic());
        all
    }
}

/// Outcome of a successful run.
#[derive(Clone, Debug, Default)]
pub struct TypeCheckReport {
    pub warnings: Vec<Diagnostic>,
    pub casts_inserted: usize,
}

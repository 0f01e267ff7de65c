//! Operator kinds carried by unary, binary, ternary, atomic and
//! storage-node instructions.

use std::fmt;

use crate::types::DataType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Sqrt,
    Floor,
    Ceil,
    /// Element-type conversion. `by_value` converts the numeric value;
    /// otherwise the bits are reinterpreted.
    Cast {
        to: DataType,
        by_value: bool,
    },
    Abs,
    Sgn,
    Sin,
    Asin,
    Cos,
    Acos,
    Tan,
    Tanh,
    Inv,
    Rcp,
    Exp,
    Log,
    Rsqrt,
    BitNot,
    LogicNot,
}

impl UnaryOp {
    pub fn is_trigonometric(self) -> bool {
        matches!(
            self,
            UnaryOp::Sin
                | UnaryOp::Asin
                | UnaryOp::Cos
                | UnaryOp::Acos
                | UnaryOp::Tan
                | UnaryOp::Tanh
        )
    }

    /// Operators defined only on floating-point operands.
    pub fn requires_real(self) -> bool {
        self.is_trigonometric() || matches!(self, UnaryOp::Floor | UnaryOp::Ceil)
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Floor => "floor",
            UnaryOp::Ceil => "ceil",
            UnaryOp::Cast { to, by_value } => {
                let mode = if *by_value { "value" } else { "bits" };
                return write!(f, "cast_{}<{}>", mode, to);
            }
            UnaryOp::Abs => "abs",
            UnaryOp::Sgn => "sgn",
            UnaryOp::Sin => "sin",
            UnaryOp::Asin => "asin",
            UnaryOp::Cos => "cos",
            UnaryOp::Acos => "acos",
            UnaryOp::Tan => "tan",
            UnaryOp::Tanh => "tanh",
            UnaryOp::Inv => "inv",
            UnaryOp::Rcp => "rcp",
            UnaryOp::Exp => "exp",
            UnaryOp::Log => "log",
            UnaryOp::Rsqrt => "rsqrt",
            UnaryOp::BitNot => "bit_not",
            UnaryOp::LogicNot => "logic_not",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Mul,
    Add,
    Sub,
    /// `/` on any operands; lowered to `Div` over reals.
    TrueDiv,
    /// `//` on any operands; lowered to `Div` over integers.
    FloorDiv,
    Div,
    Mod,
    Max,
    Min,
    BitAnd,
    BitOr,
    BitXor,
    CmpLt,
    CmpLe,
    CmpGt,
    CmpGe,
    CmpEq,
    CmpNe,
    Atan2,
    Pow,
}

impl BinaryOp {
    pub fn is_bitwise(self) -> bool {
        matches!(self, BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::CmpLt
                | BinaryOp::CmpLe
                | BinaryOp::CmpGt
                | BinaryOp::CmpGe
                | BinaryOp::CmpEq
                | BinaryOp::CmpNe
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinaryOp::Mul => "mul",
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::TrueDiv => "truediv",
            BinaryOp::FloorDiv => "floordiv",
            BinaryOp::Div => "div",
            BinaryOp::Mod => "mod",
            BinaryOp::Max => "max",
            BinaryOp::Min => "min",
            BinaryOp::BitAnd => "bit_and",
            BinaryOp::BitOr => "bit_or",
            BinaryOp::BitXor => "bit_xor",
            BinaryOp::CmpLt => "cmp_lt",
            BinaryOp::CmpLe => "cmp_le",
            BinaryOp::CmpGt => "cmp_gt",
            BinaryOp::CmpGe => "cmp_ge",
            BinaryOp::CmpEq => "cmp_eq",
            BinaryOp::CmpNe => "cmp_ne",
            BinaryOp::Atan2 => "atan2",
            BinaryOp::Pow => "pow",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TernaryOp {
    Select,
    /// Lazily evaluated if-then-else; produced by newer frontends only.
    Ifte,
}

impl fmt::Display for TernaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TernaryOp::Select => f.write_str("select"),
            TernaryOp::Ifte => f.write_str("ifte"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AtomicOp {
    Add,
    Sub,
    Max,
    Min,
    BitAnd,
    BitOr,
    BitXor,
}

impl fmt::Display for AtomicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AtomicOp::Add => "add",
            AtomicOp::Sub => "sub",
            AtomicOp::Max => "max",
            AtomicOp::Min => "min",
            AtomicOp::BitAnd => "bit_and",
            AtomicOp::BitOr => "bit_or",
            AtomicOp::BitXor => "bit_xor",
        };
        f.write_str(name)
    }
}

/// Structural queries and updates on a storage node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SNodeOpKind {
    IsActive,
    Activate,
    Deactivate,
    Append,
    Length,
}

impl fmt::Display for SNodeOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SNodeOpKind::IsActive => "is_active",
            SNodeOpKind::Activate => "activate",
            SNodeOpKind::Deactivate => "deactivate",
            SNodeOpKind::Append => "append",
            SNodeOpKind::Length => "length",
        };
        f.write_str(name)
    }
}

/// Kind of work an offloaded task performs once lowered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OffloadTask {
    Serial,
    RangeFor,
    StructFor,
    ListGen,
    Gc,
}

impl fmt::Display for OffloadTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OffloadTask::Serial => "serial",
            OffloadTask::RangeFor => "range_for",
            OffloadTask::StructFor => "struct_for",
            OffloadTask::ListGen => "listgen",
            OffloadTask::Gc => "gc",
        };
        f.write_str(name)
    }
}

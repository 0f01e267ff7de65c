use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar element type of an IR value (vector width not included).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F16,
    F32,
    F64,
    /// Placeholder for a type not inferred yet.
    Unknown,
}

impl DataType {
    /// Every element type, including `Unknown`, in table order.
    pub const ALL: [DataType; 12] = [
        DataType::I8,
        DataType::I16,
        DataType::I32,
        DataType::I64,
        DataType::U8,
        DataType::U16,
        DataType::U32,
        DataType::U64,
        DataType::F16,
        DataType::F32,
        DataType::F64,
        DataType::Unknown,
    ];

    /// Position in `ALL`; used to index the promotion table.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_signed(self) -> bool {
        matches!(self, DataType::I8 | DataType::I16 | DataType::I32 | DataType::I64)
    }

    pub const fn is_unsigned(self) -> bool {
        matches!(self, DataType::U8 | DataType::U16 | DataType::U32 | DataType::U64)
    }

    pub const fn is_integral(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub const fn is_real(self) -> bool {
        matches!(self, DataType::F16 | DataType::F32 | DataType::F64)
    }

    pub const fn is_unknown(self) -> bool {
        matches!(self, DataType::Unknown)
    }

    /// Width in bits; 0 for `Unknown`.
    pub const fn bits(self) -> u32 {
        match self {
            DataType::I8 | DataType::U8 => 8,
            DataType::I16 | DataType::U16 | DataType::F16 => 16,
            DataType::I32 | DataType::U32 | DataType::F32 => 32,
            DataType::I64 | DataType::U64 | DataType::F64 => 64,
            DataType::Unknown => 0,
        }
    }

    pub const fn signed_of_bits(bits: u32) -> Option<DataType> {
        match bits {
            8 => Some(DataType::I8),
            16 => Some(DataType::I16),
            32 => Some(DataType::I32),
            64 => Some(DataType::I64),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::I8 => "i8",
            DataType::I16 => "i16",
            DataType::I32 => "i32",
            DataType::I64 => "i64",
            DataType::U8 => "u8",
            DataType::U16 => "u16",
            DataType::U32 => "u32",
            DataType::U64 => "u64",
            DataType::F16 => "f16",
            DataType::F32 => "f32",
            DataType::F64 => "f64",
            DataType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result type of an instruction: element type plus lane count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VectorType {
    pub width: u32,
    pub data_type: DataType,
}

impl VectorType {
    pub const fn new(width: u32, data_type: DataType) -> Self {
        Self { width, data_type }
    }

    pub const fn scalar(data_type: DataType) -> Self {
        Self::new(1, data_type)
    }

    pub const fn unknown() -> Self {
        Self::scalar(DataType::Unknown)
    }

    pub const fn is_unknown(&self) -> bool {
        self.data_type.is_unknown()
    }
}

impl Default for VectorType {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for VectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.data_type, self.width)
    }
}

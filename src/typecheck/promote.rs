//! Element-type promotion.
//!
//! `promoted_type(a, b)` is the type two operands are converted to before
//! they are combined. The table is computed once at compile time:
//!
//! - equal types promote to themselves;
//! - float with float gives the wider float, float with integer the float;
//! - integers of the same signedness give the wider one;
//! - signed with unsigned gives the signed type if it is strictly wider,
//!   else the signed type twice the unsigned width, else `u64`;
//! - `unknown` with `t` gives `t`.

use crate::types::DataType;

const N: usize = DataType::ALL.len();

static PROMOTION_TABLE: [[DataType; N]; N] = build_table();

const fn build_table() -> [[DataType; N]; N] {
    let mut table = [[DataType::Unknown; N]; N];
    let mut i = 0;
    while i < N {
        let mut j = 0;
        while j < N {
            table[i][j] = promote_pair(DataType::ALL[i], DataType::ALL[j]);
            j += 1;
        }
        i += 1;
    }
    table
}

const fn wider(a: DataType, b: DataType) -> DataType {
    if a.bits() >= b.bits() {
        a
    } else {
        b
    }
}

const fn mixed_sign(signed: DataType, unsigned: DataType) -> DataType {
    if signed.bits() > unsigned.bits() {
        return signed;
    }
    match DataType::signed_of_bits(unsigned.bits() * 2) {
        Some(dt) => dt,
        None => DataType::U64,
    }
}

const fn promote_pair(a: DataType, b: DataType) -> DataType {
    if a as usize == b as usize {
        return a;
    }
    if a.is_unknown() {
        return b;
    }
    if b.is_unknown() {
        return a;
    }
    match (a.is_real(), b.is_real()) {
        (true, true) => wider(a, b),
        (true, false) => a,
        (false, true) => b,
        (false, false) => {
            if a.is_signed() == b.is_signed() {
                wider(a, b)
            } else if a.is_signed() {
                mixed_sign(a, b)
            } else {
                mixed_sign(b, a)
            }
        }
    }
}

pub fn promoted_type(a: DataType, b: DataType) -> DataType {
    PROMOTION_TABLE[a.index()][b.index()]
}

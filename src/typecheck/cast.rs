//! Cast synthesis: splice a value-preserving conversion next to an anchor.

use super::{ops::unary_result_type, TypeChecker};
use crate::ir::{StmtId, StmtKind, UnaryOp};
use crate::types::DataType;

/// Where the cast goes relative to its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CastPosition {
    Before,
    After,
}

impl TypeChecker<'_> {
    /// Convert `input` to `to`, placing the cast next to `anchor` in the
    /// anchor's block. The cast is typed before this returns, since the
    /// traversal snapshot that is running will never reach it.
    pub(super) fn insert_cast(
        &mut self,
        anchor: StmtId,
        input: StmtId,
        to: DataType,
        position: CastPosition,
    ) -> StmtId {
        let op = UnaryOp::Cast { to, by_value: true };
        let ret_type = unary_result_type(op, self.ir.ret_type(input));
        let kind = StmtKind::Unary { op, operand: input };
        let span = self.ir.stmt(anchor).span;
        let cast = match position {
            CastPosition::Before => self.ir.insert_before(anchor, kind, span),
            CastPosition::After => self.ir.insert_after(anchor, kind, span),
        };
        self.ir.set_ret_type(cast, ret_type);
        self.casts_inserted += 1;
        tracing::debug!(
            cast = %cast,
            anchor = %anchor,
            "inserted cast of {} from {} to {}",
            input,
            self.ir.data_type(input),
            to
        );
        cast
    }
}

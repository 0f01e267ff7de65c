//! IrBuilder: constructs kernel IR with nested blocks.
//!
//! The builder keeps a cursor stack of open blocks. Control constructs take a
//! closure that fills their body; the body block is popped when the closure
//! returns. Every instruction gets the builder's current span.

use super::*;

pub struct IrBuilder {
    ir: Ir,
    cursor: Vec<BlockId>,
    span: Span,
}

impl Default for IrBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IrBuilder {
    pub fn new() -> Self {
        let ir = Ir::new();
        let root = ir.root();
        Self {
            ir,
            cursor: vec![root],
            span: Span::dummy(),
        }
    }

    /// Span attached to instructions created from now on.
    pub fn set_span(&mut self, span: Span) {
        self.span = span;
    }

    pub fn finish(self) -> Ir {
        self.ir
    }

    fn current(&self) -> BlockId {
        *self.cursor.last().expect("builder cursor always holds the root")
    }

    pub fn push(&mut self, kind: StmtKind) -> StmtId {
        let block = self.current();
        self.ir.push(block, kind, self.span)
    }

    /// Preset a result type, as upstream stages do for typed producers.
    pub fn typed(&mut self, id: StmtId, ty: VectorType) -> StmtId {
        self.ir.set_ret_type(id, ty);
        id
    }

    fn nested(&mut self, fill: impl FnOnce(&mut Self)) -> BlockId {
        let block = self.ir.new_block();
        self.cursor.push(block);
        fill(self);
        self.cursor.pop();
        block
    }

    // ── Values ────────────────────────────────────────────────────

    pub fn constant(&mut self, value: ConstValue) -> StmtId {
        self.push(StmtKind::Const { value })
    }

    pub fn const_i32(&mut self, v: i32) -> StmtId {
        self.constant(ConstValue::I32(v))
    }

    pub fn const_i64(&mut self, v: i64) -> StmtId {
        self.constant(ConstValue::I64(v))
    }

    pub fn const_f32(&mut self, v: f32) -> StmtId {
        self.constant(ConstValue::F32(v))
    }

    pub fn const_f64(&mut self, v: f64) -> StmtId {
        self.constant(ConstValue::F64(v))
    }

    pub fn alloca(&mut self) -> StmtId {
        self.push(StmtKind::Alloca)
    }

    pub fn unary(&mut self, op: UnaryOp, operand: StmtId) -> StmtId {
        self.push(StmtKind::Unary { op, operand })
    }

    /// Explicit value-preserving conversion.
    pub fn cast(&mut self, operand: StmtId, to: DataType) -> StmtId {
        self.unary(UnaryOp::Cast { to, by_value: true }, operand)
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: StmtId, rhs: StmtId) -> StmtId {
        self.push(StmtKind::Binary { op, lhs, rhs })
    }

    pub fn ternary(&mut self, op: TernaryOp, op1: StmtId, op2: StmtId, op3: StmtId) -> StmtId {
        self.push(StmtKind::Ternary { op, op1, op2, op3 })
    }

    pub fn select(&mut self, cond: StmtId, on_true: StmtId, on_false: StmtId) -> StmtId {
        self.ternary(TernaryOp::Select, cond, on_true, on_false)
    }

    pub fn shuffle(&mut self, elements: Vec<VectorElement>) -> StmtId {
        self.push(StmtKind::ElementShuffle { elements })
    }

    pub fn assume_in_range(&mut self, input: StmtId, base: StmtId, low: i32, high: i32) -> StmtId {
        self.push(StmtKind::RangeAssumption {
            input,
            base,
            low,
            high,
        })
    }

    // ── Memory ────────────────────────────────────────────────────

    pub fn local_load(&mut self, slot: StmtId) -> StmtId {
        self.push(StmtKind::LocalLoad { slot })
    }

    pub fn local_store(&mut self, slot: StmtId, value: StmtId) -> StmtId {
        self.push(StmtKind::LocalStore { slot, value })
    }

    pub fn global_ptr(&mut self, snodes: Vec<SNodeId>, indices: Vec<StmtId>) -> StmtId {
        self.push(StmtKind::GlobalPtr { snodes, indices })
    }

    pub fn global_load(&mut self, ptr: StmtId) -> StmtId {
        self.push(StmtKind::GlobalLoad { ptr })
    }

    pub fn global_store(&mut self, ptr: StmtId, value: StmtId) -> StmtId {
        self.push(StmtKind::GlobalStore { ptr, value })
    }

    pub fn atomic(&mut self, op: AtomicOp, dest: StmtId, value: StmtId) -> StmtId {
        self.push(StmtKind::Atomic { op, dest, value })
    }

    pub fn snode_op(&mut self, op: SNodeOpKind, snode: SNodeId, ptr: Option<StmtId>) -> StmtId {
        self.push(StmtKind::SNodeOp {
            op,
            snode,
            ptr,
            value: None,
        })
    }

    pub fn get_ch(
        &mut self,
        input_ptr: StmtId,
        input_snode: SNodeId,
        chid: usize,
        output_snode: SNodeId,
    ) -> StmtId {
        self.push(StmtKind::GetCh {
            input_ptr,
            input_snode,
            chid,
            output_snode,
        })
    }

    pub fn arg_load(&mut self, arg: usize) -> StmtId {
        self.push(StmtKind::ArgLoad { arg })
    }

    pub fn arg_store(&mut self, arg: usize, value: StmtId) -> StmtId {
        self.push(StmtKind::ArgStore { arg, value })
    }

    pub fn external_ptr(&mut self, base_ptrs: Vec<StmtId>, indices: Vec<StmtId>) -> StmtId {
        self.push(StmtKind::ExternalPtr { base_ptrs, indices })
    }

    pub fn loop_index(&mut self, loop_stmt: StmtId, index: usize) -> StmtId {
        self.push(StmtKind::LoopIndex { loop_stmt, index })
    }

    // ── Control flow ──────────────────────────────────────────────

    pub fn if_then(&mut self, cond: StmtId, then_body: impl FnOnce(&mut Self)) -> StmtId {
        let true_block = self.nested(then_body);
        self.push(StmtKind::If {
            cond,
            true_block: Some(true_block),
            false_block: None,
        })
    }

    pub fn if_else(
        &mut self,
        cond: StmtId,
        then_body: impl FnOnce(&mut Self),
        else_body: impl FnOnce(&mut Self),
    ) -> StmtId {
        let true_block = self.nested(then_body);
        let false_block = self.nested(else_body);
        self.push(StmtKind::If {
            cond,
            true_block: Some(true_block),
            false_block: Some(false_block),
        })
    }

    /// `for i in range(begin, end)`; the body closure receives the loop id
    /// so it can query the loop index.
    pub fn range_for(
        &mut self,
        begin: StmtId,
        end: StmtId,
        body: impl FnOnce(&mut Self, StmtId),
    ) -> StmtId {
        let block = self.ir.new_block();
        let id = self.push(StmtKind::RangeFor {
            begin,
            end,
            body: block,
        });
        self.cursor.push(block);
        body(self, id);
        self.cursor.pop();
        id
    }

    pub fn struct_for(&mut self, snode: SNodeId, body: impl FnOnce(&mut Self, StmtId)) -> StmtId {
        let block = self.ir.new_block();
        let id = self.push(StmtKind::StructFor { snode, body: block });
        self.cursor.push(block);
        body(self, id);
        self.cursor.pop();
        id
    }

    pub fn while_loop(&mut self, body: impl FnOnce(&mut Self)) -> StmtId {
        let block = self.nested(body);
        self.push(StmtKind::While { body: block })
    }

    pub fn offloaded(&mut self, task: OffloadTask, body: impl FnOnce(&mut Self)) -> StmtId {
        let block = self.nested(body);
        self.push(StmtKind::Offloaded {
            task,
            body: Some(block),
        })
    }
}

//! Kernel IR consumed by the type checker.
//!
//! Instructions live in a single arena owned by [`Ir`] and are addressed by
//! [`StmtId`]. A [`Block`] is an ordered list of ids; every instruction
//! remembers the block that owns it so new instructions can be spliced in
//! next to any anchor. Operands are ids, never owned values, so one
//! instruction may feed any number of consumers.
//!
//! Control constructs (`If`, `RangeFor`, `StructFor`, `While`, `Offloaded`)
//! own nested blocks by id.

pub mod builder;
pub mod display;
pub mod ops;

use std::fmt;

use crate::span::Span;
use crate::storage::SNodeId;
use crate::types::{DataType, VectorType};

pub use self::ops::{AtomicOp, BinaryOp, OffloadTask, SNodeOpKind, TernaryOp, UnaryOp};

// ─── Ids ───────────────────────────────────────────────────────────

/// Index of an instruction in the IR arena. Displayed as `$N`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StmtId(pub u32);

impl StmtId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// Index of a block in the IR arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ─── Instructions ──────────────────────────────────────────────────

/// Literal carried by a constant instruction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConstValue {
    I32(i32),
    I64(i64),
    U32(u32),
    F32(f32),
    F64(f64),
}

impl ConstValue {
    pub fn data_type(self) -> DataType {
        match self {
            ConstValue::I32(_) => DataType::I32,
            ConstValue::I64(_) => DataType::I64,
            ConstValue::U32(_) => DataType::U32,
            ConstValue::F32(_) => DataType::F32,
            ConstValue::F64(_) => DataType::F64,
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::I32(v) => write!(f, "{}", v),
            ConstValue::I64(v) => write!(f, "{}", v),
            ConstValue::U32(v) => write!(f, "{}", v),
            ConstValue::F32(v) => write!(f, "{:?}", v),
            ConstValue::F64(v) => write!(f, "{:?}", v),
        }
    }
}

/// One lane of an element shuffle: lane `index` of instruction `stmt`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorElement {
    pub stmt: StmtId,
    pub index: u32,
}

/// The closed set of instruction variants.
#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// Local storage slot; typed by the first store into it.
    Alloca,
    Const {
        value: ConstValue,
    },
    If {
        cond: StmtId,
        true_block: Option<BlockId>,
        false_block: Option<BlockId>,
    },
    RangeFor {
        begin: StmtId,
        end: StmtId,
        body: BlockId,
    },
    StructFor {
        snode: SNodeId,
        body: BlockId,
    },
    While {
        body: BlockId,
    },
    LocalLoad {
        slot: StmtId,
    },
    LocalStore {
        slot: StmtId,
        value: StmtId,
    },
    GlobalLoad {
        ptr: StmtId,
    },
    GlobalStore {
        ptr: StmtId,
        value: StmtId,
    },
    Atomic {
        op: AtomicOp,
        dest: StmtId,
        value: StmtId,
    },
    /// Address of a tensor element; one lane per addressed node.
    GlobalPtr {
        snodes: Vec<SNodeId>,
        indices: Vec<StmtId>,
    },
    SNodeOp {
        op: SNodeOpKind,
        snode: SNodeId,
        ptr: Option<StmtId>,
        value: Option<StmtId>,
    },
    Unary {
        op: UnaryOp,
        operand: StmtId,
    },
    Binary {
        op: BinaryOp,
        lhs: StmtId,
        rhs: StmtId,
    },
    Ternary {
        op: TernaryOp,
        op1: StmtId,
        op2: StmtId,
        op3: StmtId,
    },
    ElementShuffle {
        elements: Vec<VectorElement>,
    },
    /// `input` is known to lie in `[base + low, base + high)`.
    RangeAssumption {
        input: StmtId,
        base: StmtId,
        low: i32,
        high: i32,
    },
    ArgLoad {
        arg: usize,
    },
    ArgStore {
        arg: usize,
        value: StmtId,
    },
    /// Address into host memory passed as kernel arguments.
    ExternalPtr {
        base_ptrs: Vec<StmtId>,
        indices: Vec<StmtId>,
    },
    LoopIndex {
        loop_stmt: StmtId,
        index: usize,
    },
    GetCh {
        input_ptr: StmtId,
        input_snode: SNodeId,
        chid: usize,
        output_snode: SNodeId,
    },
    Offloaded {
        task: OffloadTask,
        body: Option<BlockId>,
    },
}

impl StmtKind {
    /// Value operands read by this instruction, in operand order.
    ///
    /// `LoopIndex` refers to its loop structurally and reports no operands.
    pub fn operands(&self) -> Vec<StmtId> {
        match self {
            StmtKind::Alloca
            | StmtKind::Const { .. }
            | StmtKind::StructFor { .. }
            | StmtKind::While { .. }
            | StmtKind::ArgLoad { .. }
            | StmtKind::LoopIndex { .. }
            | StmtKind::Offloaded { .. } => Vec::new(),
            StmtKind::If { cond, .. } => vec![*cond],
            StmtKind::RangeFor { begin, end, .. } => vec![*begin, *end],
            StmtKind::LocalLoad { slot } => vec![*slot],
            StmtKind::LocalStore { slot, value } => vec![*slot, *value],
            StmtKind::GlobalLoad { ptr } => vec![*ptr],
            StmtKind::GlobalStore { ptr, value } => vec![*ptr, *value],
            StmtKind::Atomic { dest, value, .. } => vec![*dest, *value],
            StmtKind::GlobalPtr { indices, .. } => indices.clone(),
            StmtKind::SNodeOp { ptr, value, .. } => ptr.iter().chain(value.iter()).copied().collect(),
            StmtKind::Unary { operand, .. } => vec![*operand],
            StmtKind::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
            StmtKind::Ternary { op1, op2, op3, .. } => vec![*op1, *op2, *op3],
            StmtKind::ElementShuffle { elements } => elements.iter().map(|e| e.stmt).collect(),
            StmtKind::RangeAssumption { input, base, .. } => vec![*input, *base],
            StmtKind::ArgStore { value, .. } => vec![*value],
            StmtKind::ExternalPtr { base_ptrs, indices } => {
                base_ptrs.iter().chain(indices.iter()).copied().collect()
            }
            StmtKind::GetCh { input_ptr, .. } => vec![*input_ptr],
        }
    }

    /// Nested blocks owned by this instruction, in execution order.
    pub fn blocks(&self) -> Vec<BlockId> {
        match self {
            StmtKind::If {
                true_block,
                false_block,
                ..
            } => true_block.iter().chain(false_block.iter()).copied().collect(),
            StmtKind::RangeFor { body, .. }
            | StmtKind::StructFor { body, .. }
            | StmtKind::While { body } => vec![*body],
            StmtKind::Offloaded { body, .. } => body.iter().copied().collect(),
            _ => Vec::new(),
        }
    }

    /// Short mnemonic used by the printer and in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            StmtKind::Alloca => "alloca",
            StmtKind::Const { .. } => "const",
            StmtKind::If { .. } => "if",
            StmtKind::RangeFor { .. } => "range_for",
            StmtKind::StructFor { .. } => "struct_for",
            StmtKind::While { .. } => "while",
            StmtKind::LocalLoad { .. } => "local_load",
            StmtKind::LocalStore { .. } => "local_store",
            StmtKind::GlobalLoad { .. } => "global_load",
            StmtKind::GlobalStore { .. } => "global_store",
            StmtKind::Atomic { .. } => "atomic",
            StmtKind::GlobalPtr { .. } => "global_ptr",
            StmtKind::SNodeOp { .. } => "snode_op",
            StmtKind::Unary { .. } => "unary",
            StmtKind::Binary { .. } => "binary",
            StmtKind::Ternary { .. } => "ternary",
            StmtKind::ElementShuffle { .. } => "shuffle",
            StmtKind::RangeAssumption { .. } => "assume_in_range",
            StmtKind::ArgLoad { .. } => "arg_load",
            StmtKind::ArgStore { .. } => "arg_store",
            StmtKind::ExternalPtr { .. } => "external_ptr",
            StmtKind::LoopIndex { .. } => "loop_index",
            StmtKind::GetCh { .. } => "get_ch",
            StmtKind::Offloaded { .. } => "offloaded",
        }
    }
}

/// A single IR instruction.
#[derive(Clone, Debug)]
pub struct Stmt {
    pub id: StmtId,
    pub span: Span,
    pub ret_type: VectorType,
    pub kind: StmtKind,
    block: BlockId,
}

impl Stmt {
    /// Block that owns this instruction.
    pub fn block(&self) -> BlockId {
        self.block
    }

    pub fn is_const(&self) -> bool {
        matches!(self.kind, StmtKind::Const { .. })
    }
}

/// An ordered instruction list.
#[derive(Clone, Debug, Default)]
pub struct Block {
    pub stmts: Vec<StmtId>,
    /// Control instruction owning this block; `None` for the root.
    pub parent: Option<StmtId>,
}

// ─── Arena ─────────────────────────────────────────────────────────

/// Arena holding every instruction and block of one kernel.
#[derive(Clone, Debug)]
pub struct Ir {
    stmts: Vec<Stmt>,
    blocks: Vec<Block>,
    root: BlockId,
}

impl Default for Ir {
    fn default() -> Self {
        Self::new()
    }
}

impl Ir {
    pub fn new() -> Self {
        Self {
            stmts: Vec::new(),
            blocks: vec![Block::default()],
            root: BlockId(0),
        }
    }

    pub fn root(&self) -> BlockId {
        self.root
    }

    /// Number of instructions ever created (reachable or not).
    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    pub fn stmt_mut(&mut self, id: StmtId) -> &mut Stmt {
        &mut self.stmts[id.index()]
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    pub fn ret_type(&self, id: StmtId) -> VectorType {
        self.stmt(id).ret_type
    }

    pub fn data_type(&self, id: StmtId) -> DataType {
        self.stmt(id).ret_type.data_type
    }

    pub fn set_ret_type(&mut self, id: StmtId, ty: VectorType) {
        self.stmt_mut(id).ret_type = ty;
    }

    /// Create an empty block, detached until a control instruction claims it.
    pub fn new_block(&mut self) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(Block::default());
        id
    }

    fn alloc(&mut self, block: BlockId, kind: StmtKind, span: Span) -> StmtId {
        let id = StmtId(self.stmts.len() as u32);
        let ret_type = match &kind {
            StmtKind::Const { value } => VectorType::scalar(value.data_type()),
            _ => VectorType::unknown(),
        };
        for owned in kind.blocks() {
            self.blocks[owned.index()].parent = Some(id);
        }
        self.stmts.push(Stmt {
            id,
            span,
            ret_type,
            kind,
            block,
        });
        id
    }

    /// Append an instruction at the end of `block`.
    pub fn push(&mut self, block: BlockId, kind: StmtKind, span: Span) -> StmtId {
        let id = self.alloc(block, kind, span);
        self.blocks[block.index()].stmts.push(id);
        id
    }

    fn position(&self, anchor: StmtId) -> (BlockId, usize) {
        let block = self.stmt(anchor).block;
        let pos = self.blocks[block.index()]
            .stmts
            .iter()
            .position(|s| *s == anchor)
            .expect("instruction is listed in its owning block");
        (block, pos)
    }

    /// Splice a new instruction into the anchor's block, right before it.
    pub fn insert_before(&mut self, anchor: StmtId, kind: StmtKind, span: Span) -> StmtId {
        let (block, pos) = self.position(anchor);
        let id = self.alloc(block, kind, span);
        self.blocks[block.index()].stmts.insert(pos, id);
        id
    }

    /// Splice a new instruction into the anchor's block, right after it.
    pub fn insert_after(&mut self, anchor: StmtId, kind: StmtKind, span: Span) -> StmtId {
        let (block, pos) = self.position(anchor);
        let id = self.alloc(block, kind, span);
        self.blocks[block.index()].stmts.insert(pos + 1, id);
        id
    }

    /// Every instruction reachable from the root, in program order
    /// (a control instruction precedes the contents of its blocks).
    pub fn reachable(&self) -> Vec<StmtId> {
        let mut out = Vec::with_capacity(self.stmts.len());
        self.collect_block(self.root, &mut out);
        out
    }

    fn collect_block(&self, block: BlockId, out: &mut Vec<StmtId>) {
        for &id in &self.block(block).stmts {
            out.push(id);
            for nested in self.stmt(id).kind.blocks() {
                self.collect_block(nested, out);
            }
        }
    }

    /// Reachable value-preserving casts.
    pub fn casts(&self) -> Vec<StmtId> {
        self.reachable()
            .into_iter()
            .filter(|id| {
                matches!(
                    self.stmt(*id).kind,
                    StmtKind::Unary {
                        op: UnaryOp::Cast { by_value: true, .. },
                        ..
                    }
                )
            })
            .collect()
    }
}

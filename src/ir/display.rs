//! Textual IR dump.
//!
//! One instruction per line, `<type> $id = body`, nested blocks indented by
//! two spaces. Used for debugging, diagnostics notes and tests.

use std::fmt::Write;

use super::{BlockId, Ir, StmtId, StmtKind};

fn join<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    let parts: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    parts.join(", ")
}

/// The instruction's own line, without nested blocks.
pub fn stmt_text(ir: &Ir, id: StmtId) -> String {
    let stmt = ir.stmt(id);
    let body = match &stmt.kind {
        StmtKind::Alloca => "alloca".to_string(),
        StmtKind::Const { value } => format!("const {}", value),
        StmtKind::If { cond, .. } => format!("if {}", cond),
        StmtKind::RangeFor { begin, end, .. } => format!("range_for {}..{}", begin, end),
        StmtKind::StructFor { snode, .. } => format!("struct_for {}", snode),
        StmtKind::While { .. } => "while".to_string(),
        StmtKind::LocalLoad { slot } => format!("local_load {}", slot),
        StmtKind::LocalStore { slot, value } => format!("local_store {} <- {}", slot, value),
        StmtKind::GlobalLoad { ptr } => format!("global_load {}", ptr),
        StmtKind::GlobalStore { ptr, value } => format!("global_store {} <- {}", ptr, value),
        StmtKind::Atomic { op, dest, value } => format!("atomic_{} {} {}", op, dest, value),
        StmtKind::GlobalPtr { snodes, indices } => {
            format!("global_ptr [{}] [{}]", join(snodes), join(indices))
        }
        StmtKind::SNodeOp {
            op,
            snode,
            ptr,
            value,
        } => {
            let mut s = format!("{} {}", op, snode);
            for operand in ptr.iter().chain(value.iter()) {
                let _ = write!(s, " {}", operand);
            }
            s
        }
        StmtKind::Unary { op, operand } => format!("{} {}", op, operand),
        StmtKind::Binary { op, lhs, rhs } => format!("{} {} {}", op, lhs, rhs),
        StmtKind::Ternary { op, op1, op2, op3 } => format!("{} {} {} {}", op, op1, op2, op3),
        StmtKind::ElementShuffle { elements } => {
            let lanes = elements.iter().map(|e| format!("{}[{}]", e.stmt, e.index));
            format!("shuffle [{}]", join(lanes))
        }
        StmtKind::RangeAssumption {
            input,
            base,
            low,
            high,
        } => format!("assume_in_range {} {}+[{}, {})", input, base, low, high),
        StmtKind::ArgLoad { arg } => format!("arg_load {}", arg),
        StmtKind::ArgStore { arg, value } => format!("arg_store {} <- {}", arg, value),
        StmtKind::ExternalPtr { base_ptrs, indices } => {
            format!("external_ptr [{}] [{}]", join(base_ptrs), join(indices))
        }
        StmtKind::LoopIndex { loop_stmt, index } => format!("loop_index {} {}", loop_stmt, index),
        StmtKind::GetCh {
            input_ptr,
            input_snode,
            chid,
            output_snode,
        } => format!(
            "get_ch {} {}->{} {}",
            input_ptr, input_snode, chid, output_snode
        ),
        StmtKind::Offloaded { task, .. } => format!("offloaded {}", task),
    };
    format!("<{}> {} = {}", stmt.ret_type, id, body)
}

/// Dump every instruction reachable from the root block.
pub fn print_ir(ir: &Ir) -> String {
    let mut out = String::new();
    print_block(ir, ir.root(), 0, &mut out);
    out
}

fn print_block(ir: &Ir, block: BlockId, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for &id in &ir.block(block).stmts {
        let nested = ir.stmt(id).kind.blocks();
        let _ = write!(out, "{}{}", indent, stmt_text(ir, id));
        if nested.is_empty() {
            out.push('\n');
            continue;
        }
        for (i, inner) in nested.iter().enumerate() {
            if i == 0 {
                out.push_str(" {\n");
            } else {
                let _ = writeln!(out, "{}}} else {{", indent);
            }
            print_block(ir, *inner, depth + 1, out);
        }
        let _ = writeln!(out, "{}}}", indent);
    }
}

pub mod batch;
pub mod config;
pub mod diagnostic;
pub mod ir;
pub mod kernel;
pub mod span;
pub mod storage;
pub mod typecheck;
pub mod types;

// Re-export public API
pub use batch::typecheck_kernels;
pub use config::{CompileConfig, NarrowingPolicy};
pub use diagnostic::{render_diagnostics, Diagnostic, Severity};
pub use ir::builder::IrBuilder;
pub use ir::display::print_ir;
pub use ir::{BlockId, Ir, StmtId, StmtKind};
pub use kernel::{Kernel, KernelArg, KernelSignature};
pub use storage::{SNodeId, SNodeKind, SNodeTree, StorageTree};
pub use typecheck::{
    promoted_type, typecheck, CheckContext, TypeCheckFailure, TypeCheckReport, TypeError,
};
pub use types::{DataType, VectorType};

/// Type check one kernel from its parts, rendering diagnostics to stderr
/// against `source` when it is available.
pub fn check_kernel(
    kernel: &mut Kernel,
    config: &CompileConfig,
    storage: &dyn StorageTree,
    source: Option<(&str, &str)>,
) -> Result<TypeCheckReport, TypeCheckFailure> {
    let result = kernel.typecheck(config, storage);
    if let Some((filename, text)) = source {
        match &result {
            Ok(report) => render_diagnostics(&report.warnings, filename, text),
            Err(failure) => render_diagnostics(&failure.diagnostics(), filename, text),
        }
    }
    result
}

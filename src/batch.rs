//! Parallel type checking of independent kernels.
//!
//! Each kernel gets its own checker; configuration and the storage tree are
//! shared read-only. Results come back in input order.

use rayon::prelude::*;

use crate::config::CompileConfig;
use crate::kernel::Kernel;
use crate::storage::StorageTree;
use crate::typecheck::{TypeCheckFailure, TypeCheckReport};

/// Type check every kernel in place using rayon parallel iteration.
pub fn typecheck_kernels(
    kernels: &mut [Kernel],
    config: &CompileConfig,
    storage: &dyn StorageTree,
) -> Vec<Result<TypeCheckReport, TypeCheckFailure>> {
    let results: Vec<_> = kernels
        .par_iter_mut()
        .map(|kernel| kernel.typecheck(config, storage))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        tracing::debug!(failed, total = results.len(), "batch type check finished with errors");
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::builder::IrBuilder;
    use crate::ir::{BinaryOp, UnaryOp};
    use crate::kernel::KernelSignature;
    use crate::storage::SNodeTree;
    use crate::typecheck::TypeError;
    use crate::types::DataType;

    fn add_kernel(name: &str, scale: f64) -> Kernel {
        let mut b = IrBuilder::new();
        let x = b.arg_load(0);
        let y = b.const_f64(scale);
        let sum = b.binary(BinaryOp::Add, x, y);
        b.arg_store(1, sum);
        let sig = KernelSignature::new().arg(DataType::F32).ret(DataType::F64);
        Kernel::new(name, sig, b.finish())
    }

    fn broken_kernel() -> Kernel {
        let mut b = IrBuilder::new();
        let x = b.const_i32(3);
        b.unary(UnaryOp::Cos, x);
        Kernel::new("broken", KernelSignature::new(), b.finish())
    }

    #[test]
    fn test_results_follow_input_order() {
        let mut kernels: Vec<Kernel> = (0..16)
            .map(|i| add_kernel(&format!("k{}", i), i as f64))
            .collect();
        kernels.insert(5, broken_kernel());

        let results = typecheck_kernels(&mut kernels, &CompileConfig::default(), &SNodeTree::new());
        assert_eq!(results.len(), 17);
        for (i, result) in results.iter().enumerate() {
            if i == 5 {
                let failure = result.as_ref().unwrap_err();
                assert!(matches!(failure.error, TypeError::RealOnly { .. }));
            } else {
                let report = result.as_ref().unwrap();
                assert_eq!(report.casts_inserted, 1);
            }
        }
        assert_eq!(kernels[0].ir.casts().len(), 1);
    }

    #[test]
    fn test_empty_batch() {
        let results = typecheck_kernels(&mut [], &CompileConfig::default(), &SNodeTree::new());
        assert!(results.is_empty());
    }
}

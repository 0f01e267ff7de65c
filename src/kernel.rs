//! Kernel signature and the kernel unit handed to the type checker.

use crate::config::CompileConfig;
use crate::ir::Ir;
use crate::storage::StorageTree;
use crate::typecheck::{CheckContext, TypeCheckFailure, TypeCheckReport};
use crate::types::DataType;

/// One argument slot of a kernel's call signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KernelArg {
    pub data_type: DataType,
    /// Slot written by the kernel instead of read.
    pub is_return_value: bool,
}

/// Ordered argument descriptors of a kernel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KernelSignature {
    pub args: Vec<KernelArg>,
}

impl KernelSignature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter slot.
    pub fn arg(mut self, data_type: DataType) -> Self {
        self.args.push(KernelArg {
            data_type,
            is_return_value: false,
        });
        self
    }

    /// Append a return-value slot.
    pub fn ret(mut self, data_type: DataType) -> Self {
        self.args.push(KernelArg {
            data_type,
            is_return_value: true,
        });
        self
    }

    pub fn get(&self, index: usize) -> Option<&KernelArg> {
        self.args.get(index)
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// A built kernel: its name, call signature and IR.
#[derive(Clone, Debug)]
pub struct Kernel {
    pub name: String,
    pub signature: KernelSignature,
    pub ir: Ir,
}

impl Kernel {
    pub fn new(name: impl Into<String>, signature: KernelSignature, ir: Ir) -> Self {
        Self {
            name: name.into(),
            signature,
            ir,
        }
    }

    /// Run the type checker over this kernel's IR in place.
    pub fn typecheck(
        &mut self,
        config: &CompileConfig,
        storage: &dyn StorageTree,
    ) -> Result<TypeCheckReport, TypeCheckFailure> {
        let _span = tracing::debug_span!("typecheck", kernel = %self.name).entered();
        let ctx = CheckContext {
            config,
            signature: &self.signature,
            storage,
        };
        crate::typecheck::typecheck(&mut self.ir, ctx)
    }
}

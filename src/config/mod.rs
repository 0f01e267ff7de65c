use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diagnostic::Diagnostic;
use crate::span::Span;
use crate::types::DataType;

/// What to do when an implicit conversion may lose precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrowingPolicy {
    /// Insert the cast and report a warning.
    #[default]
    Warn,
    /// Treat the narrowing as a fatal type error.
    Deny,
}

/// Compiler configuration read by the type checker.
///
/// Immutable for the duration of a run and shared by every kernel checked
/// with it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileConfig {
    /// Integer type operands of `//` are coerced to.
    pub default_ip: DataType,
    /// Floating-point type operands of `/` are coerced to.
    pub default_fp: DataType,
    pub narrowing: NarrowingPolicy,
    /// Reject kernels where a consumed value is still untyped after the pass.
    pub verify_totality: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            default_ip: DataType::I32,
            default_fp: DataType::F32,
            narrowing: NarrowingPolicy::Warn,
            verify_totality: true,
        }
    }
}

/// On-disk layout: everything lives under a `[typecheck]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    typecheck: CompileConfig,
}

impl CompileConfig {
    pub fn with_default_ip(mut self, dt: DataType) -> Self {
        self.default_ip = dt;
        self
    }

    pub fn with_default_fp(mut self, dt: DataType) -> Self {
        self.default_fp = dt;
        self
    }

    pub fn with_narrowing(mut self, policy: NarrowingPolicy) -> Self {
        self.narrowing = policy;
        self
    }

    pub fn with_verify_totality(mut self, on: bool) -> Self {
        self.verify_totality = on;
        self
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, Diagnostic> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Diagnostic::error(
                format!("cannot read config '{}': {}", path.display(), e),
                Span::dummy(),
            )
        })?;
        Self::parse_toml(&content, path)
    }

    pub fn parse_toml(content: &str, path: &Path) -> Result<Self, Diagnostic> {
        let err =
            |msg: String| Diagnostic::error(format!("{}: {}", path.display(), msg), Span::dummy());

        let file: ConfigFile = toml::from_str(content).map_err(|e| err(e.to_string()))?;
        let config = file.typecheck;
        config.validate().map_err(err)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.default_ip.is_integral() {
            return Err(format!(
                "typecheck.default_ip must be an integer type, got {}",
                self.default_ip
            ));
        }
        if !self.default_fp.is_real() {
            return Err(format!(
                "typecheck.default_fp must be a floating-point type, got {}",
                self.default_fp
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;

// This module defines the BackendRegistry trait, the resolver's only view of the code
// generation backends. A registry answers three questions: whether a backend family was built
// into this process (a capability query replacing compile-time guarded initialization in the
// resolver), which target descriptor serves a triple (or a diagnostic string explaining why
// none does), and how to construct a target machine from a descriptor and a MachineConfig.
// MachineConfig bundles triple, CPU, features, relocation model, code model and optimization
// level; the resolver always asks for PIC relocation and default optimization.

//! Backend registry abstraction.

use crate::core::format::BackendFamily;
use inkwell::targets::{CodeModel, RelocMode};
use inkwell::OptimizationLevel;

/// Everything needed to build a target machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    pub triple: String,
    pub cpu: String,
    pub features: String,
    pub reloc_mode: RelocMode,
    pub code_model: CodeModel,
    pub opt_level: OptimizationLevel,
}

impl MachineConfig {
    /// Configuration used for fused kernels: PIC, default code model and `-O2`.
    pub fn for_kernel(triple: &str, cpu: &str, features: &str) -> Self {
        Self {
            triple: triple.to_string(),
            cpu: cpu.to_string(),
            features: features.to_string(),
            reloc_mode: RelocMode::PIC,
            code_model: CodeModel::Default,
            opt_level: OptimizationLevel::Default,
        }
    }
}

/// Process-wide registry of code generation backends.
///
/// Implementations own any one-time backend initialization. The resolver
/// borrows a registry and never synchronizes around it.
pub trait BackendRegistry {
    /// Target descriptor handle.
    type Target;
    /// Compiled target machine.
    type Machine;

    /// Is the given backend family available in this build?
    fn supports(&self, _family: BackendFamily) -> bool {
        true
    }

    /// Find the target serving `triple`, or return the registry's diagnostic.
    ///
    /// `family` is the same family [`supports`](Self::supports) was asked
    /// about, so backend initialization never depends on parsing `triple`.
    fn lookup_target(&self, family: BackendFamily, triple: &str) -> Result<Self::Target, String>;

    /// Construct a target machine. `None` if the backend refuses.
    fn create_target_machine(&self, target: &Self::Target, config: &MachineConfig) -> Option<Self::Machine>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_machine_config() {
        let config = MachineConfig::for_kernel("nvptx64-nvidia-cuda", "sm_80", "+ptx80");
        assert_eq!(config.reloc_mode, RelocMode::PIC);
        assert_eq!(config.code_model, CodeModel::Default);
        assert_eq!(config.opt_level, OptimizationLevel::Default);
        assert_eq!(config.cpu, "sm_80");
        assert_eq!(config.features, "+ptx80");
    }
}

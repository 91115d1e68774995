// This module provides LlvmRegistry, the BackendRegistry backed by LLVM's own target registry
// through inkwell. Backend availability follows the crate features: `ptx` links and initializes
// NVPTX, `amdgcn` does the same for AMDGPU. Each backend is initialized at most once per
// process (std::sync::Once), on the first lookup for that family (as named by the requested format), so resolvers
// never perform global initialization themselves. SPIR-V lookups go straight to LLVM and
// succeed only if the linked LLVM registers a SPIR-V target.

//! LLVM-backed backend registry.

use crate::core::{BackendFamily, BackendRegistry, MachineConfig};
use inkwell::targets::{Target, TargetMachine, TargetTriple};

#[cfg(any(feature = "ptx", feature = "amdgcn"))]
use inkwell::targets::InitializationConfig;
#[cfg(any(feature = "ptx", feature = "amdgcn"))]
use std::sync::Once;

#[cfg(feature = "ptx")]
static NVPTX_INIT: Once = Once::new();
#[cfg(feature = "amdgcn")]
static AMDGPU_INIT: Once = Once::new();

/// Registry over LLVM's process-wide target registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct LlvmRegistry;

impl LlvmRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Initialize the backend for `family` if it is built in.
    pub fn initialize(&self, family: BackendFamily) {
        match family {
            #[cfg(feature = "ptx")]
            BackendFamily::Nvptx => NVPTX_INIT.call_once(|| {
                log::debug!("Initializing NVPTX backend");
                Target::initialize_nvptx(&InitializationConfig::default());
            }),
            #[cfg(feature = "amdgcn")]
            BackendFamily::Amdgpu => AMDGPU_INIT.call_once(|| {
                log::debug!("Initializing AMDGPU backend");
                Target::initialize_amd_gpu(&InitializationConfig::default());
            }),
            _ => {}
        }
    }
}

impl BackendRegistry for LlvmRegistry {
    type Target = Target;
    type Machine = TargetMachine;

    fn supports(&self, family: BackendFamily) -> bool {
        match family {
            BackendFamily::Spirv => true,
            BackendFamily::Nvptx => cfg!(feature = "ptx"),
            BackendFamily::Amdgpu => cfg!(feature = "amdgcn"),
        }
    }

    fn lookup_target(&self, family: BackendFamily, triple: &str) -> Result<Target, String> {
        self.initialize(family);
        Target::from_triple(&TargetTriple::create(triple)).map_err(|err| err.to_string())
    }

    fn create_target_machine(&self, target: &Target, config: &MachineConfig) -> Option<TargetMachine> {
        target.create_target_machine(
            &TargetTriple::create(&config.triple),
            &config.cpu,
            &config.features,
            config.opt_level,
            config.reloc_mode,
            config.code_model,
        )
    }
}

//! Target resolution for dynamically fused GPU kernels.
//!
//! Decides which LLVM backend and target configuration a fused kernel is
//! compiled for (SPIR-V, NVPTX or AMDGPU), caches the target descriptor and
//! target machine for that choice, and records the chosen CPU / features on
//! the kernel function so later compilation stages agree with it.
//!
//! # Primary Usage
//!
//! ```ignore
//! use fusion_target::core::{BinaryFormat, TraceConfig};
//! use fusion_target::llvm::LlvmRegistry;
//! use fusion_target::target::{ResolverOptions, TargetResolver};
//!
//! let registry = LlvmRegistry::new();
//! let options = ResolverOptions::new(BinaryFormat::Amdgcn).with_kernel("fused_0");
//! let mut resolver = TargetResolver::new(&registry, &module, &options);
//! let machine = resolver.get_or_create_target_machine()?;
//! ```
//!
//! # Architecture
//!
//! - [`core`] - Formats, introspection/registry traits, tracing and errors
//! - [`target`] - The resolver and the kernel attribute annotator
//! - [`llvm`] - inkwell-backed implementations of the core traits

pub mod core;
pub mod llvm;
pub mod target;

pub use crate::core::{
    BackendFamily, BackendRegistry, BinaryFormat, ConfigurationError, Error, MachineConfig,
    ModuleView, Result, TargetLookupError, TraceConfig, TraceSink,
};
pub use crate::llvm::{prepare_fused_kernel, prepare_fused_kernel_for_format, LlvmRegistry};
pub use crate::target::{
    CacheState, KernelTargetAnnotator, PreservedAnalyses, ResolverOptions, SettingSource,
    TargetResolver,
};

//! LLVM integration.
//!
//! Implements the core traits on top of inkwell: [`ModuleView`] and
//! [`KernelFunction`] for LLVM modules and functions, and [`LlvmRegistry`]
//! as the [`BackendRegistry`] over LLVM's target registry.
//!
//! # Example
//! ```ignore
//! use fusion_target::core::{BinaryFormat, TraceConfig};
//! use fusion_target::llvm::{prepare_fused_kernel, LlvmRegistry};
//! use fusion_target::target::ResolverOptions;
//!
//! let registry = LlvmRegistry::new();
//! let options = ResolverOptions::new(BinaryFormat::Ptx).with_kernel("fused_0");
//! let mut resolver = prepare_fused_kernel(&registry, &module, &options, TraceConfig::disabled())?;
//! let machine = resolver.get_or_create_target_machine()?;
//! ```
//!
//! [`ModuleView`]: crate::core::ModuleView
//! [`KernelFunction`]: crate::core::KernelFunction
//! [`BackendRegistry`]: crate::core::BackendRegistry

pub mod driver;
pub mod module;
pub mod registry;

pub use driver::{prepare_fused_kernel, prepare_fused_kernel_for_format};
pub use module::annotate_kernel;
pub use registry::LlvmRegistry;

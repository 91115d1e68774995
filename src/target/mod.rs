//! Target resolution for fused kernels.
//!
//! [`TargetResolver`] picks the triple, CPU and features for a requested
//! [`BinaryFormat`](crate::core::BinaryFormat) and lazily caches the backend's
//! target descriptor and target machine. [`KernelTargetAnnotator`] writes the
//! same CPU / features choice onto the kernel function so later compilation
//! stages agree with it.
//!
//! ```ignore
//! let mut resolver = TargetResolver::new(&registry, &module, &options);
//! let mut annotator = resolver.annotator(TraceConfig::disabled());
//! annotator.run(&mut kernel);
//! let machine = resolver.get_or_create_target_machine()?;
//! ```

pub mod annotate;
pub mod resolver;

pub use annotate::{KernelTargetAnnotator, PreservedAnalyses, ANNOTATOR_DEBUG_CATEGORY};
pub use resolver::{CacheState, ResolverOptions, SettingSource, TargetResolver};

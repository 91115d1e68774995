//! One-call setup of a fused kernel for code generation.

use crate::core::{BinaryFormat, Result, TraceConfig};
use crate::llvm::module::annotate_kernel;
use crate::llvm::registry::LlvmRegistry;
use crate::target::{ResolverOptions, TargetResolver};
use inkwell::module::Module;

/// Resolve the target for `module`, annotate the kernel named in `options`
/// and build the target machine.
///
/// The returned resolver holds the cached target machine for code
/// generation. A kernel name that is missing from the module is not an
/// error; only the annotation is skipped.
pub fn prepare_fused_kernel<'r>(
    registry: &'r LlvmRegistry,
    module: &Module<'_>,
    options: &ResolverOptions,
    trace: TraceConfig,
) -> Result<TargetResolver<'r, LlvmRegistry>> {
    let mut resolver = TargetResolver::new(registry, module, options);

    if let Some(kernel) = options.kernel.as_deref().filter(|name| !name.is_empty()) {
        let mut annotator = resolver.annotator(trace);
        if annotate_kernel(module, kernel, &mut annotator).is_none() {
            log::debug!("Kernel {} not found, skipping target annotation", kernel);
        }
    }

    resolver.get_or_create_target_machine()?;
    Ok(resolver)
}

/// Like [`prepare_fused_kernel`], for callers that carry the format as a
/// name (`"spirv"`, `"ptx"`, `"amdgcn"`, ...).
///
/// An unknown name is reported as [`Error::Configuration`](crate::core::Error::Configuration).
pub fn prepare_fused_kernel_for_format<'r>(
    registry: &'r LlvmRegistry,
    module: &Module<'_>,
    format_name: &str,
    kernel: Option<&str>,
    trace: TraceConfig,
) -> Result<TargetResolver<'r, LlvmRegistry>> {
    let format: BinaryFormat = format_name.parse()?;
    let mut options = ResolverOptions::new(format);
    if let Some(kernel) = kernel {
        options = options.with_kernel(kernel);
    }
    prepare_fused_kernel(registry, module, &options, trace)
}

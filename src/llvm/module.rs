// This module connects the introspection traits to inkwell. An inkwell Module is a ModuleView:
// its declared triple is the SPIR-V triple and its functions are looked up by name. An inkwell
// FunctionValue is both a KernelFunction and a KernelFunctionMut, reading and writing string
// attributes at the function attribute index. Writing goes through the function's own context
// so no Context handle needs to be threaded through the annotator. LLVM replaces a string
// attribute with the same key, which keeps annotation idempotent.

//! inkwell implementations of the introspection traits.

use crate::core::{KernelFunction, KernelFunctionMut, ModuleView};
use crate::target::{KernelTargetAnnotator, PreservedAnalyses};
use inkwell::attributes::AttributeLoc;
use inkwell::module::Module;
use inkwell::values::FunctionValue;

impl<'ctx> ModuleView for Module<'ctx> {
    type Function<'m> = FunctionValue<'ctx> where Self: 'm;

    fn default_triple(&self) -> String {
        self.get_triple().as_str().to_string_lossy().into_owned()
    }

    fn function(&self, name: &str) -> Option<FunctionValue<'ctx>> {
        self.get_function(name)
    }
}

impl KernelFunction for FunctionValue<'_> {
    fn name(&self) -> Option<String> {
        let name = self.get_name().to_string_lossy();
        if name.is_empty() {
            None
        } else {
            Some(name.into_owned())
        }
    }

    fn string_attribute(&self, key: &str) -> Option<String> {
        self.get_string_attribute(AttributeLoc::Function, key)
            .map(|attr| attr.get_string_value().to_string_lossy().into_owned())
    }
}

impl KernelFunctionMut for FunctionValue<'_> {
    fn set_string_attribute(&mut self, key: &str, value: &str) {
        let context = self.get_type().get_context();
        let attr = context.create_string_attribute(key, value);
        self.add_attribute(AttributeLoc::Function, attr);
    }
}

/// Run `annotator` on the function called `kernel`.
///
/// Returns `None` if the module has no such function.
pub fn annotate_kernel(
    module: &Module<'_>,
    kernel: &str,
    annotator: &mut KernelTargetAnnotator,
) -> Option<PreservedAnalyses> {
    let mut function = module.get_function(kernel)?;
    Some(annotator.run(&mut function))
}

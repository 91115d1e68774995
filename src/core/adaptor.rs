// This module defines the introspection traits target resolution uses to look at an IR
// module without depending on a concrete IR library. ModuleView exposes the module's declared
// target triple and lookup of a function by name. KernelFunction reads a function's name and
// its string attributes; KernelFunctionMut adds writing a string attribute, which is all the
// attribute annotator needs. The attribute keys shared by the resolver (reader) and the
// annotator (writer) live here so both sides agree on them. The LLVM implementations are in
// crate::llvm::module.

//! Module and function introspection.
//!
//! The resolver only ever reads: the module's default triple and, for the
//! named kernel, its `target-cpu` / `target-features` attributes. The
//! annotator writes the same keys back (plus `tune-cpu`).

/// Function attribute selecting the ISA / CPU to compile for.
pub const TARGET_CPU_ATTRIBUTE: &str = "target-cpu";

/// Function attribute selecting the CPU to tune scheduling for.
pub const TUNE_CPU_ATTRIBUTE: &str = "tune-cpu";

/// Function attribute carrying the comma separated feature list.
pub const TARGET_FEATURES_ATTRIBUTE: &str = "target-features";

/// Read access to a single function's target-related metadata.
pub trait KernelFunction {
    /// Name of the function, `None` when unnamed.
    fn name(&self) -> Option<String>;

    /// Value of the string function attribute `key`, if present.
    fn string_attribute(&self, key: &str) -> Option<String>;
}

/// Write access used by the annotator.
pub trait KernelFunctionMut: KernelFunction {
    /// Set (or replace) the string function attribute `key`.
    fn set_string_attribute(&mut self, key: &str, value: &str);
}

/// Read-only view of an IR module.
pub trait ModuleView {
    type Function<'m>: KernelFunction
    where
        Self: 'm;

    /// Target triple declared by the module; empty if none.
    fn default_triple(&self) -> String;

    /// Look up a function by name.
    fn function(&self, name: &str) -> Option<Self::Function<'_>>;
}

// This module is the hub for the IR- and backend-independent parts of target resolution. It
// groups the binary format table (formats, backend families and their hard-coded target
// defaults), the introspection traits used to read and annotate kernel functions, the backend
// registry abstraction the resolver caches descriptors and machines from, opt-in tracing for
// IR transformations, and the thiserror-based error types. Nothing in here talks to LLVM
// directly apart from reusing inkwell's relocation/code-model/optimization enums.

//! Core target-resolution infrastructure.
//!
//! # Key Components
//!
//! - `format` - [`BinaryFormat`] and its per-format [`FormatDefaults`]
//! - `adaptor` - [`ModuleView`] / [`KernelFunction`] introspection traits
//! - `registry` - [`BackendRegistry`] and [`MachineConfig`]
//! - `trace` - [`TraceConfig`] for opt-in pass tracing
//! - `error` - [`ConfigurationError`] and [`TargetLookupError`]

pub mod adaptor;
pub mod error;
pub mod format;
pub mod registry;
pub mod trace;

pub use adaptor::{
    KernelFunction,
    KernelFunctionMut,
    ModuleView,
    TARGET_CPU_ATTRIBUTE,
    TARGET_FEATURES_ATTRIBUTE,
    TUNE_CPU_ATTRIBUTE,
};

pub use error::{
    ConfigurationError,
    Error,
    Result,
    TargetLookupError,
};

pub use format::{
    BackendFamily,
    BinaryFormat,
    FormatDefaults,
};

pub use registry::{
    BackendRegistry,
    MachineConfig,
};

pub use trace::{
    TraceConfig,
    TraceSink,
};

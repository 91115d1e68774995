// This module implements TargetResolver, the per-request object that decides which target a
// fused kernel is compiled for and caches the backend objects for it. Construction is
// infallible and purely data driven: the format's FormatDefaults fix the triple (or defer to the
// module's triple for SPIR-V), then CPU and features are resolved independently with the
// precedence explicit option > kernel function attribute > format default. The target
// descriptor and target machine are created lazily on first request and cached for the rest of
// the resolver's life; lookup failures are reported as TargetLookupError, recorded for
// diagnostics, and never cached, so a later call retries the registry. The resolver holds a
// shared borrow of the process-wide BackendRegistry and is meant to be owned by exactly one
// fusion-and-compile request.

//! Target selection and lazy backend-object caching.

use crate::core::{
    BackendRegistry, BinaryFormat, KernelFunction, MachineConfig, ModuleView, TargetLookupError,
    TraceConfig, TARGET_CPU_ATTRIBUTE, TARGET_FEATURES_ATTRIBUTE,
};
use crate::target::annotate::KernelTargetAnnotator;
use std::fmt;

/// Caller-supplied inputs for a [`TargetResolver`].
///
/// Empty strings are treated the same as not supplying a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    pub format: BinaryFormat,
    pub cpu: Option<String>,
    pub features: Option<String>,
    pub kernel: Option<String>,
}

impl ResolverOptions {
    pub fn new(format: BinaryFormat) -> Self {
        Self { format, cpu: None, features: None, kernel: None }
    }

    pub fn with_cpu(mut self, cpu: impl Into<String>) -> Self {
        self.cpu = Some(cpu.into());
        self
    }

    pub fn with_features(mut self, features: impl Into<String>) -> Self {
        self.features = Some(features.into());
        self
    }

    /// Name of the fused kernel whose attributes may override the defaults.
    pub fn with_kernel(mut self, kernel: impl Into<String>) -> Self {
        self.kernel = Some(kernel.into());
        self
    }
}

/// Where a resolved CPU or feature string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingSource {
    /// Passed in [`ResolverOptions`].
    Explicit,
    /// Read from the kernel function's attribute.
    KernelAttribute,
    /// Hard-coded default of the format.
    FormatDefault,
    /// Nothing supplied and no default; the setting is empty.
    Unset,
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingSource::Explicit => "explicit",
            SettingSource::KernelAttribute => "kernel attribute",
            SettingSource::FormatDefault => "default",
            SettingSource::Unset => "unset",
        };
        f.write_str(name)
    }
}

/// State of one lazily created backend object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    NotRequested,
    Resolved,
    /// Last attempt failed; the next request retries.
    Failed,
}

#[derive(Debug)]
struct Cached<T> {
    label: &'static str,
    value: Option<T>,
    last_error: Option<TargetLookupError>,
}

impl<T> Cached<T> {
    fn new(label: &'static str) -> Self {
        Self { label, value: None, last_error: None }
    }

    fn state(&self) -> CacheState {
        match (&self.value, &self.last_error) {
            (Some(_), _) => CacheState::Resolved,
            (None, Some(_)) => CacheState::Failed,
            (None, None) => CacheState::NotRequested,
        }
    }

    fn get_or_try_init<F>(&mut self, init: F) -> Result<&T, TargetLookupError>
    where
        F: FnOnce() -> Result<T, TargetLookupError>,
    {
        match self.value {
            Some(ref value) => {
                log::trace!("Using cached {}", self.label);
                Ok(value)
            }
            None => match init() {
                Ok(value) => {
                    self.last_error = None;
                    let value: &T = self.value.insert(value);
                    Ok(value)
                }
                Err(err) => {
                    self.last_error = Some(err.clone());
                    Err(err)
                }
            },
        }
    }
}

/// Resolves triple, CPU and features for a fused kernel and caches the
/// target descriptor and target machine built from them.
pub struct TargetResolver<'r, R: BackendRegistry> {
    registry: &'r R,
    format: BinaryFormat,
    triple: String,
    cpu: String,
    cpu_source: SettingSource,
    features: String,
    features_source: SettingSource,
    target: Cached<R::Target>,
    machine: Cached<R::Machine>,
}

impl<'r, R: BackendRegistry> TargetResolver<'r, R> {
    /// Run format-specific initialization against `module`.
    pub fn new<M: ModuleView>(registry: &'r R, module: &M, options: &ResolverOptions) -> Self {
        let format = options.format;
        let defaults = format.defaults();

        let triple = match defaults.triple {
            Some(triple) => triple.to_string(),
            None => module.default_triple(),
        };

        let explicit_cpu = non_empty(options.cpu.as_deref());
        let explicit_features = non_empty(options.features.as_deref());

        let ((cpu, cpu_source), (features, features_source)) = if defaults.consults_kernel {
            let kernel = non_empty(options.kernel.as_deref()).and_then(|name| module.function(name));
            (
                resolve_setting(explicit_cpu, kernel.as_ref(), TARGET_CPU_ATTRIBUTE, defaults.cpu),
                resolve_setting(explicit_features, kernel.as_ref(), TARGET_FEATURES_ATTRIBUTE, defaults.features),
            )
        } else {
            (pass_through(explicit_cpu), pass_through(explicit_features))
        };

        log::debug!(
            "Resolved {} target: triple={} cpu={:?} ({}) features={:?} ({})",
            format, triple, cpu, cpu_source, features, features_source
        );

        Self {
            registry,
            format,
            triple,
            cpu,
            cpu_source,
            features,
            features_source,
            target: Cached::new("target"),
            machine: Cached::new("target machine"),
        }
    }

    pub fn format(&self) -> BinaryFormat {
        self.format
    }

    pub fn triple(&self) -> &str {
        &self.triple
    }

    pub fn cpu(&self) -> &str {
        &self.cpu
    }

    pub fn features(&self) -> &str {
        &self.features
    }

    pub fn cpu_source(&self) -> SettingSource {
        self.cpu_source
    }

    pub fn features_source(&self) -> SettingSource {
        self.features_source
    }

    pub fn target_state(&self) -> CacheState {
        self.target.state()
    }

    pub fn machine_state(&self) -> CacheState {
        self.machine.state()
    }

    /// Failure of the most recent unsuccessful target lookup, if the target
    /// has not been resolved since.
    pub fn last_target_error(&self) -> Option<&TargetLookupError> {
        self.target.last_error.as_ref()
    }

    /// Return the cached target descriptor, looking it up on first use.
    pub fn get_or_create_target(&mut self) -> Result<&R::Target, TargetLookupError> {
        let Self { registry, format, triple, target, .. } = self;
        target.get_or_try_init(|| lookup_target(*registry, *format, triple.as_str()))
    }

    /// Return the cached target machine, creating the target first if needed.
    ///
    /// A target lookup failure is returned unchanged.
    pub fn get_or_create_target_machine(&mut self) -> Result<&R::Machine, TargetLookupError> {
        let Self { registry, format, triple, cpu, features, target, machine, .. } = self;
        machine.get_or_try_init(|| {
            let target = target.get_or_try_init(|| lookup_target(*registry, *format, triple.as_str()))?;
            let config = MachineConfig::for_kernel(triple.as_str(), cpu.as_str(), features.as_str());
            let created = registry.create_target_machine(target, &config).ok_or_else(|| {
                TargetLookupError::MachineCreation {
                    triple: config.triple.clone(),
                    cpu: config.cpu.clone(),
                    features: config.features.clone(),
                }
            })?;
            log::debug!("Created target machine for {} (cpu {:?})", config.triple, config.cpu);
            Ok(created)
        })
    }

    /// Annotator that stamps this resolver's CPU / features onto a kernel.
    pub fn annotator(&self, trace: TraceConfig) -> KernelTargetAnnotator {
        KernelTargetAnnotator::new(self.cpu.clone(), self.features.clone()).with_trace(trace)
    }
}

impl<R: BackendRegistry> fmt::Debug for TargetResolver<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetResolver")
            .field("format", &self.format)
            .field("triple", &self.triple)
            .field("cpu", &self.cpu)
            .field("features", &self.features)
            .field("target", &self.target.state())
            .field("machine", &self.machine.state())
            .finish()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn pass_through(explicit: Option<&str>) -> (String, SettingSource) {
    match explicit {
        Some(value) => (value.to_string(), SettingSource::Explicit),
        None => (String::new(), SettingSource::Unset),
    }
}

fn resolve_setting<F: KernelFunction>(
    explicit: Option<&str>,
    kernel: Option<&F>,
    key: &str,
    default: Option<&str>,
) -> (String, SettingSource) {
    if let Some(value) = explicit {
        return (value.to_string(), SettingSource::Explicit);
    }
    // A present attribute wins even if its value is empty.
    if let Some(value) = kernel.and_then(|kernel| kernel.string_attribute(key)) {
        return (value, SettingSource::KernelAttribute);
    }
    match default {
        Some(value) => (value.to_string(), SettingSource::FormatDefault),
        None => (String::new(), SettingSource::Unset),
    }
}

fn lookup_target<R: BackendRegistry>(
    registry: &R,
    format: BinaryFormat,
    triple: &str,
) -> Result<R::Target, TargetLookupError> {
    let family = format.family();
    if !registry.supports(family) {
        return Err(TargetLookupError::Unsupported { family, triple: triple.to_string() });
    }
    let target = registry
        .lookup_target(family, triple)
        .map_err(|message| TargetLookupError::Lookup { triple: triple.to_string(), message })?;
    log::debug!("Created target for {}", triple);
    Ok(target)
}

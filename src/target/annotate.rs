// This module implements KernelTargetAnnotator, the function pass that records the resolved
// target choice on the fused kernel itself. A non-empty CPU is written to both `target-cpu`
// and `tune-cpu`; non-empty features go to `target-features`; empty inputs leave the function
// untouched so that earlier annotations survive. The pass only adds attributes, so it reports
// PreservedAnalyses::All and re-running it with the same inputs changes nothing. Tracing of the
// function being processed is opt-in through an injected TraceConfig.

//! Kernel target attribute annotation.

use crate::core::{
    KernelFunctionMut, TraceConfig, TARGET_CPU_ATTRIBUTE, TARGET_FEATURES_ATTRIBUTE,
    TUNE_CPU_ATTRIBUTE,
};

/// Debug category matched against trace switches for this pass.
pub const ANNOTATOR_DEBUG_CATEGORY: &str = "sycl-target-postfix";

/// Which analyses survive a pass run. The annotator only adds attributes,
/// so it always preserves everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreservedAnalyses {
    All,
}

/// Writes target CPU / features attributes onto a kernel function.
#[derive(Debug)]
pub struct KernelTargetAnnotator {
    cpu: String,
    features: String,
    trace: TraceConfig,
}

impl KernelTargetAnnotator {
    pub fn new(cpu: impl Into<String>, features: impl Into<String>) -> Self {
        Self {
            cpu: cpu.into(),
            features: features.into(),
            trace: TraceConfig::disabled(),
        }
    }

    pub fn with_trace(mut self, trace: TraceConfig) -> Self {
        self.trace = trace;
        self
    }

    pub fn cpu(&self) -> &str {
        &self.cpu
    }

    pub fn features(&self) -> &str {
        &self.features
    }

    /// Annotate `function`.
    pub fn run<F: KernelFunctionMut + ?Sized>(&mut self, function: &mut F) -> PreservedAnalyses {
        if self.trace.is_enabled() {
            let name = function.name().unwrap_or_else(|| "unnamed kernel".to_string());
            self.trace.emit(
                ANNOTATOR_DEBUG_CATEGORY,
                format_args!("Working on function:\n==================\n{}\n\n", name),
            );
        }

        if !self.cpu.is_empty() {
            function.set_string_attribute(TARGET_CPU_ATTRIBUTE, &self.cpu);
            function.set_string_attribute(TUNE_CPU_ATTRIBUTE, &self.cpu);
        }
        if !self.features.is_empty() {
            function.set_string_attribute(TARGET_FEATURES_ATTRIBUTE, &self.features);
        }

        PreservedAnalyses::All
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{KernelFunction, TraceSink};
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::io::Write;
    use std::rc::Rc;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct TestFunction {
        name: Option<String>,
        attrs: BTreeMap<String, String>,
    }

    impl KernelFunction for TestFunction {
        fn name(&self) -> Option<String> {
            self.name.clone()
        }

        fn string_attribute(&self, key: &str) -> Option<String> {
            self.attrs.get(key).cloned()
        }
    }

    impl KernelFunctionMut for TestFunction {
        fn set_string_attribute(&mut self, key: &str, value: &str) {
            self.attrs.insert(key.to_string(), value.to_string());
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sets_cpu_tune_and_features() {
        let mut func = TestFunction::default();
        let mut pass = KernelTargetAnnotator::new("sm_80", "+ptx80");

        assert_eq!(pass.run(&mut func), PreservedAnalyses::All);
        assert_eq!(func.attrs.len(), 3);
        assert_eq!(func.attrs["target-cpu"], "sm_80");
        assert_eq!(func.attrs["tune-cpu"], "sm_80");
        assert_eq!(func.attrs["target-features"], "+ptx80");
    }

    #[test]
    fn test_idempotent() {
        let mut once = TestFunction::default();
        KernelTargetAnnotator::new("gfx90a", "+xnack").run(&mut once);

        let mut twice = TestFunction::default();
        let mut pass = KernelTargetAnnotator::new("gfx90a", "+xnack");
        pass.run(&mut twice);
        pass.run(&mut twice);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_cpu_keeps_existing_cpu() {
        let mut func = TestFunction::default();
        func.attrs.insert("target-cpu".to_string(), "sm_70".to_string());

        KernelTargetAnnotator::new("", "+ptx80").run(&mut func);

        assert_eq!(func.attrs["target-cpu"], "sm_70");
        assert!(!func.attrs.contains_key("tune-cpu"));
        assert_eq!(func.attrs["target-features"], "+ptx80");
    }

    #[test]
    fn test_empty_inputs_are_noop() {
        let mut func = TestFunction::default();
        func.attrs.insert("target-features".to_string(), "+sm_50".to_string());
        let before = func.clone();

        KernelTargetAnnotator::new("", "").run(&mut func);
        assert_eq!(func, before);
    }

    #[test]
    fn test_tracing_does_not_change_result() {
        let buf = SharedBuf::default();
        let mut traced = TestFunction::default();
        KernelTargetAnnotator::new("sm_80", "+ptx80")
            .with_trace(TraceConfig::to_writer(buf.clone()))
            .run(&mut traced);

        let mut plain = TestFunction::default();
        KernelTargetAnnotator::new("sm_80", "+ptx80").run(&mut plain);

        assert_eq!(traced, plain);
        let output = String::from_utf8_lossy(&buf.0.borrow()).to_string();
        assert!(output.contains("unnamed kernel"));
    }

    #[test]
    fn test_sycl_debug_switch_enables_trace() {
        let buf = SharedBuf::default();
        let trace = TraceConfig::from_debug_spec(
            Some("sycl-target-postfix"),
            ANNOTATOR_DEBUG_CATEGORY,
            TraceSink::Writer(Box::new(buf.clone())),
        );
        assert!(trace.is_enabled());

        let mut func = TestFunction { name: Some("fused_1".to_string()), ..Default::default() };
        KernelTargetAnnotator::new("sm_80", "").with_trace(trace).run(&mut func);

        let output = String::from_utf8_lossy(&buf.0.borrow()).to_string();
        assert!(output.contains("fused_1"));
        assert_eq!(func.attrs["target-cpu"], "sm_80");
    }

    #[test]
    fn test_trace_prints_function_name() {
        let buf = SharedBuf::default();
        let mut func = TestFunction { name: Some("fused_0".to_string()), ..Default::default() };
        KernelTargetAnnotator::new("gfx906", "")
            .with_trace(TraceConfig::to_writer(buf.clone()))
            .run(&mut func);

        let output = String::from_utf8_lossy(&buf.0.borrow()).to_string();
        assert!(output.starts_with("Working on function:"));
        assert!(output.contains("fused_0"));
    }
}

// This module defines the error types for fused-kernel target resolution using the thiserror
// crate. ConfigurationError covers programming errors on the caller side, such as asking for
// a binary format this crate has no backend for. TargetLookupError is the recoverable failure
// surfaced by the resolver's resolve-or-create accessors: the backend family is not built in,
// the backend registry rejected the triple (carrying the registry's own diagnostic text), or
// the registry refused to construct a target machine. Error is the umbrella type used by the
// LLVM driver helpers, with Result<T> as the matching alias.

//! Error types for target resolution.
//!
//! Using thiserror for more idiomatic error handling.

use crate::core::format::BackendFamily;
use thiserror::Error;

/// Caller-side configuration defects. These are not meant to be retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Unknown binary format: {name}")]
    UnknownFormat {
        name: String,
    },
}

/// Recoverable failure while obtaining the target descriptor or target machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetLookupError {
    #[error("No {family} backend available in this build (triple `{triple}`)")]
    Unsupported {
        family: BackendFamily,
        triple: String,
    },

    #[error("Failed to create Target with error {message}")]
    Lookup {
        triple: String,
        message: String,
    },

    #[error("Failed to create TargetMachine for `{triple}` (cpu `{cpu}`, features `{features}`)")]
    MachineCreation {
        triple: String,
        cpu: String,
        features: String,
    },
}

impl TargetLookupError {
    /// Triple the failed request was made for.
    pub fn triple(&self) -> &str {
        match self {
            TargetLookupError::Unsupported { triple, .. }
            | TargetLookupError::Lookup { triple, .. }
            | TargetLookupError::MachineCreation { triple, .. } => triple,
        }
    }
}

/// Umbrella error for driver-level helpers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    TargetLookup(#[from] TargetLookupError),
}

/// Result type alias for driver-level operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_message_is_kept_verbatim() {
        let err = TargetLookupError::Lookup {
            triple: "nvptx64-nvidia-cuda".to_string(),
            message: "No available targets are compatible with triple".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to create Target with error No available targets are compatible with triple"
        );
        assert_eq!(err.triple(), "nvptx64-nvidia-cuda");
    }

    #[test]
    fn test_umbrella_is_transparent() {
        let inner = TargetLookupError::Unsupported {
            family: BackendFamily::Amdgpu,
            triple: "amdgcn-amd-amdhsa".to_string(),
        };
        let outer: Error = inner.clone().into();
        assert_eq!(outer.to_string(), inner.to_string());
        assert!(outer.to_string().contains("AMDGPU"));
    }
}

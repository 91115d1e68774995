// This module defines the binary formats a fused kernel can be compiled to and the pure data
// each format contributes to target resolution. BinaryFormat is the closed set of outputs
// (SPIR-V, PTX, AMDGCN). BackendFamily names the LLVM backend serving a format and is what the
// backend registry is asked about in its capability query. FormatDefaults is the per-format
// table: a fixed triple (or None when the module's own triple is used), whether the kernel's
// attributes are consulted, and the hard-coded CPU and feature fallbacks. Note that AMDGCN has
// no feature fallback while PTX does.

//! Binary formats and their target defaults.

use crate::core::error::ConfigurationError;
use std::fmt;
use std::str::FromStr;

/// Output binary kind requested for a fused kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryFormat {
    /// SPIR-V module, consumed by OpenCL / Level Zero devices.
    Spirv,
    /// PTX assembly for NVIDIA devices.
    Ptx,
    /// AMDGPU code object.
    Amdgcn,
}

/// LLVM backend family that serves a [`BinaryFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendFamily {
    Spirv,
    Nvptx,
    Amdgpu,
}

/// Target data a format contributes before any override is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDefaults {
    /// Fixed triple, or `None` to take the module's declared triple.
    pub triple: Option<&'static str>,
    /// Whether explicit/attribute/default precedence applies at all.
    pub consults_kernel: bool,
    pub cpu: Option<&'static str>,
    pub features: Option<&'static str>,
}

pub const NVPTX_TRIPLE: &str = "nvptx64-nvidia-cuda";
pub const AMDGPU_TRIPLE: &str = "amdgcn-amd-amdhsa";

pub const PTX_DEFAULT_CPU: &str = "sm_50";
pub const PTX_DEFAULT_FEATURES: &str = "+sm_50,+ptx76";
pub const AMDGPU_DEFAULT_CPU: &str = "gfx906";

impl BinaryFormat {
    /// All supported formats.
    pub const ALL: [BinaryFormat; 3] = [BinaryFormat::Spirv, BinaryFormat::Ptx, BinaryFormat::Amdgcn];

    /// Backend family that must be available to compile this format.
    pub fn family(self) -> BackendFamily {
        match self {
            BinaryFormat::Spirv => BackendFamily::Spirv,
            BinaryFormat::Ptx => BackendFamily::Nvptx,
            BinaryFormat::Amdgcn => BackendFamily::Amdgpu,
        }
    }

    /// Per-format target defaults.
    pub fn defaults(self) -> FormatDefaults {
        match self {
            BinaryFormat::Spirv => FormatDefaults {
                triple: None,
                consults_kernel: false,
                cpu: None,
                features: None,
            },
            BinaryFormat::Ptx => FormatDefaults {
                triple: Some(NVPTX_TRIPLE),
                consults_kernel: true,
                cpu: Some(PTX_DEFAULT_CPU),
                features: Some(PTX_DEFAULT_FEATURES),
            },
            BinaryFormat::Amdgcn => FormatDefaults {
                triple: Some(AMDGPU_TRIPLE),
                consults_kernel: true,
                cpu: Some(AMDGPU_DEFAULT_CPU),
                // No feature default for AMDGPU.
                features: None,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryFormat::Spirv => "spirv",
            BinaryFormat::Ptx => "ptx",
            BinaryFormat::Amdgcn => "amdgcn",
        }
    }
}

impl fmt::Display for BinaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BinaryFormat {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spirv" | "spir-v" => Ok(BinaryFormat::Spirv),
            "ptx" | "nvptx" => Ok(BinaryFormat::Ptx),
            "amdgcn" | "amdgpu" => Ok(BinaryFormat::Amdgcn),
            _ => Err(ConfigurationError::UnknownFormat { name: s.to_string() }),
        }
    }
}

impl fmt::Display for BackendFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendFamily::Spirv => "SPIR-V",
            BackendFamily::Nvptx => "NVPTX",
            BackendFamily::Amdgpu => "AMDGPU",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format_names() {
        assert_eq!("ptx".parse::<BinaryFormat>(), Ok(BinaryFormat::Ptx));
        assert_eq!("NVPTX".parse::<BinaryFormat>(), Ok(BinaryFormat::Ptx));
        assert_eq!("spir-v".parse::<BinaryFormat>(), Ok(BinaryFormat::Spirv));
        assert_eq!(" amdgpu ".parse::<BinaryFormat>(), Ok(BinaryFormat::Amdgcn));

        for format in BinaryFormat::ALL {
            assert_eq!(format.to_string().parse::<BinaryFormat>(), Ok(format));
        }
    }

    #[test]
    fn test_unknown_format_is_configuration_error() {
        let err = "llvm".parse::<BinaryFormat>().unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownFormat { name: "llvm".to_string() });
    }

    #[test]
    fn test_amdgcn_has_no_feature_default() {
        assert_eq!(BinaryFormat::Amdgcn.defaults().features, None);
        assert_eq!(BinaryFormat::Ptx.defaults().features, Some("+sm_50,+ptx76"));
        assert_eq!(BinaryFormat::Spirv.defaults().triple, None);
    }
}

//! Host platform detection and mapping to upstream Bun release tags.
//!
//! Bun publishes release archives under its own platform naming scheme
//! (`linux-x64`, `darwin-aarch64`, ...). This module parses the richer
//! identifiers a host reports (Rust target triples, shorthand pairs like
//! `arm64-darwin`) and maps them onto that scheme, together with the local
//! executable filename convention.
//!
//! Resolution is strict: a platform with no table entry is an error, never
//! a best-guess fallback. Launching a binary built for the wrong platform
//! is strictly worse than refusing to.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while resolving a platform identifier.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The raw string could not be parsed into an architecture and OS family.
    #[error("cannot parse platform string '{0}'")]
    Unparseable(String),

    /// The platform parsed cleanly but has no upstream Bun distribution.
    #[error("unsupported platform '{raw}' (supported: {supported})")]
    Unsupported {
        /// The raw identifier as given by the caller.
        raw: String,
        /// Human-readable list of supported platform pairs.
        supported: &'static str,
    },
}

/// CPU architectures with an upstream Bun distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuArch {
    X86_64,
    Aarch64,
}

impl CpuArch {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "x86_64" | "x64" | "amd64" => Some(Self::X86_64),
            "aarch64" | "arm64" => Some(Self::Aarch64),
            _ => None,
        }
    }
}

impl fmt::Display for CpuArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X86_64 => write!(f, "x86_64"),
            Self::Aarch64 => write!(f, "aarch64"),
        }
    }
}

/// Operating-system families bunbox distinguishes between.
///
/// The family decides the executable filename convention and the `PATH`
/// handling rules; version qualifiers (`darwin23`) never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Linux,
    Darwin,
    Windows,
}

impl OsFamily {
    /// Whether this family follows Windows conventions (`.exe` suffix,
    /// `;` path separator, case-insensitive paths).
    pub const fn is_windows(self) -> bool {
        matches!(self, Self::Windows)
    }

    /// The `PATH` list separator for this family.
    pub const fn path_separator(self) -> char {
        if self.is_windows() { ';' } else { ':' }
    }

    /// The local filename of the Bun executable on this family.
    pub const fn executable_name(self) -> &'static str {
        if self.is_windows() { "bun.exe" } else { "bun" }
    }

    fn parse(token: &str) -> Option<(Self, Option<String>)> {
        for (prefix, family) in [
            ("linux", Self::Linux),
            ("darwin", Self::Darwin),
            ("macos", Self::Darwin),
            ("windows", Self::Windows),
            ("mingw", Self::Windows),
            ("mswin", Self::Windows),
            ("cygwin", Self::Windows),
        ] {
            if let Some(rest) = token.strip_prefix(prefix) {
                let variant = if rest.is_empty() {
                    None
                } else {
                    Some(rest.to_string())
                };
                return Some((family, variant));
            }
        }
        None
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Darwin => write!(f, "darwin"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// A parsed host-platform identifier.
///
/// `os_variant` carries whatever qualifier followed the family name in the
/// raw string (`darwin23` -> `"23"`, `x86_64-pc-windows-msvc` -> `"msvc"`).
/// Variants identify the platform precisely but are deliberately excluded
/// from mapping decisions: a generic and a version-qualified identifier of
/// the same family resolve identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformId {
    pub cpu_arch: CpuArch,
    pub os_family: OsFamily,
    pub os_variant: Option<String>,
}

impl PlatformId {
    /// Parse a raw platform identifier.
    ///
    /// Accepts Rust target triples (`x86_64-unknown-linux-gnu`,
    /// `aarch64-apple-darwin`, `x86_64-pc-windows-msvc`) as well as
    /// shorthand pairs (`arm64-darwin`, `x64-mingw-ucrt`).
    pub fn parse(raw: &str) -> Result<Self, PlatformError> {
        let mut tokens = raw.split('-');

        let arch_token = tokens
            .next()
            .ok_or_else(|| PlatformError::Unparseable(raw.to_string()))?;
        let cpu_arch = CpuArch::parse(arch_token)
            .ok_or_else(|| PlatformError::Unparseable(raw.to_string()))?;

        let mut family = None;
        for token in tokens {
            if let Some((os_family, variant)) = OsFamily::parse(token) {
                family = Some((os_family, variant));
                break;
            }
        }
        let (os_family, os_variant) =
            family.ok_or_else(|| PlatformError::Unparseable(raw.to_string()))?;

        Ok(Self {
            cpu_arch,
            os_family,
            os_variant,
        })
    }

    /// The identifier of the current process's host platform.
    pub fn host() -> Result<Self, PlatformError> {
        let raw = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);
        Self::parse(&raw)
    }

    /// Family-aware equivalence: same architecture and OS family,
    /// regardless of variant qualifiers.
    pub fn same_family(&self, other: &Self) -> bool {
        self.cpu_arch == other.cpu_arch && self.os_family == other.os_family
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.os_variant {
            Some(variant) => write!(f, "{}-{}{}", self.cpu_arch, self.os_family, variant),
            None => write!(f, "{}-{}", self.cpu_arch, self.os_family),
        }
    }
}

/// One entry of the platform mapping table.
#[derive(Debug)]
pub struct PlatformMapping {
    pub cpu_arch: CpuArch,
    pub os_family: OsFamily,
    /// The tag Bun uses in its release archive names (`bun-<tag>.zip`).
    pub release_tag: &'static str,
    /// The local filename of the extracted executable.
    pub executable: &'static str,
}

/// Platforms with an upstream Bun distribution, most specific first.
///
/// By construction at most one entry matches a concrete (arch, family)
/// pair; anything outside the table fails resolution.
const MAPPINGS: &[PlatformMapping] = &[
    PlatformMapping {
        cpu_arch: CpuArch::X86_64,
        os_family: OsFamily::Linux,
        release_tag: "linux-x64",
        executable: "bun",
    },
    PlatformMapping {
        cpu_arch: CpuArch::Aarch64,
        os_family: OsFamily::Linux,
        release_tag: "linux-aarch64",
        executable: "bun",
    },
    PlatformMapping {
        cpu_arch: CpuArch::Aarch64,
        os_family: OsFamily::Darwin,
        release_tag: "darwin-aarch64",
        executable: "bun",
    },
    PlatformMapping {
        cpu_arch: CpuArch::X86_64,
        os_family: OsFamily::Darwin,
        release_tag: "darwin-x64",
        executable: "bun",
    },
    PlatformMapping {
        cpu_arch: CpuArch::X86_64,
        os_family: OsFamily::Windows,
        release_tag: "windows-x64-baseline",
        executable: "bun.exe",
    },
];

const SUPPORTED: &str =
    "x86_64-linux, aarch64-linux, x86_64-darwin, aarch64-darwin, x86_64-windows";

/// Resolve a raw platform identifier against the mapping table.
pub fn resolve(raw: &str) -> Result<&'static PlatformMapping, PlatformError> {
    let id = PlatformId::parse(raw)?;
    MAPPINGS
        .iter()
        .find(|m| m.cpu_arch == id.cpu_arch && m.os_family == id.os_family)
        .ok_or_else(|| PlatformError::Unsupported {
            raw: raw.to_string(),
            supported: SUPPORTED,
        })
}

/// Resolve the current host platform.
pub fn resolve_host() -> Result<&'static PlatformMapping, PlatformError> {
    let raw = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);
    resolve(&raw)
}

//! Target definitions - one entry of `gn desc --format=json`.
//!
//! The schema follows GN's `desc_builder.cc`. Only the fields that have a
//! Bazel counterpart are kept; everything else in the record is accepted and
//! dropped during decoding.

use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// File extensions treated as headers when `public` is `"*"`.
pub const HEADER_EXTENSIONS: &[&str] = &["h", "hh", "hpp", "hxx"];

/// The GN output type of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    /// Runs a script once
    Action,

    /// Copies files into the build directory
    Copy,

    /// Linked binary
    Executable,

    /// Collection of dependencies, produces nothing itself
    Group,

    /// Compiled objects without an archive
    SourceSet,

    /// Static archive
    StaticLibrary,

    /// Test binary
    Test,
}

impl TargetType {
    /// The name GN uses for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Action => "action",
            TargetType::Copy => "copy",
            TargetType::Executable => "executable",
            TargetType::Group => "group",
            TargetType::SourceSet => "source_set",
            TargetType::StaticLibrary => "static_library",
            TargetType::Test => "test",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of a target's headers are public.
///
/// GN writes either the string `"*"` or a list of paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Public {
    /// Every header in `sources` is public
    All,
    /// Only these headers are public
    Explicit(Vec<String>),
}

impl Default for Public {
    fn default() -> Self {
        Public::All
    }
}

impl<'de> Deserialize<'de> for Public {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPublic {
            Sentinel(String),
            List(Vec<String>),
        }

        match RawPublic::deserialize(deserializer)? {
            RawPublic::Sentinel(s) if s == "*" => Ok(Public::All),
            RawPublic::Sentinel(s) => Err(de::Error::custom(format!(
                "expected \"*\" or a list of headers for `public`, found {:?}",
                s
            ))),
            RawPublic::List(headers) => Ok(Public::Explicit(headers)),
        }
    }
}

/// One target as described by `gn desc`.
#[derive(Debug, Clone, Deserialize)]
pub struct Target {
    /// GN output type
    #[serde(rename = "type")]
    pub kind: TargetType,

    /// Patterns of targets allowed to depend on this one
    #[serde(default)]
    pub visibility: Vec<String>,

    /// Only usable from other testonly targets
    #[serde(default)]
    pub testonly: bool,

    /// Files owned by the target
    #[serde(default)]
    pub sources: Vec<String>,

    /// Public headers
    #[serde(default)]
    pub public: Public,

    /// Extra files an action reads
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Script an action runs
    #[serde(default)]
    pub script: String,

    /// Arguments passed to the script
    #[serde(default)]
    pub args: Vec<String>,

    /// Files an action or copy produces
    #[serde(default)]
    pub outputs: Vec<String>,

    /// Direct dependencies, by identity
    #[serde(default)]
    pub deps: Vec<String>,

    /// Archiver flags
    #[serde(default)]
    pub arflags: Vec<String>,

    /// Assembler flags
    #[serde(default)]
    pub asmflags: Vec<String>,

    /// Flags for every C-family compile
    #[serde(default)]
    pub cflags: Vec<String>,

    /// Flags for C compiles only
    #[serde(default)]
    pub cflags_c: Vec<String>,

    /// Flags for C++ compiles only
    #[serde(default)]
    pub cflags_cc: Vec<String>,

    /// Linker flags
    #[serde(default)]
    pub ldflags: Vec<String>,

    /// Preprocessor defines
    #[serde(default)]
    pub defines: Vec<String>,

    /// Include search path
    #[serde(default)]
    pub include_dirs: Vec<String>,

    /// System libraries to link; decoded but not rendered
    #[serde(default)]
    pub libs: Vec<String>,
}

impl Target {
    /// Create an empty target of the given type.
    pub fn new(kind: TargetType) -> Self {
        Target {
            kind,
            visibility: Vec::new(),
            testonly: false,
            sources: Vec::new(),
            public: Public::All,
            inputs: Vec::new(),
            script: String::new(),
            args: Vec::new(),
            outputs: Vec::new(),
            deps: Vec::new(),
            arflags: Vec::new(),
            asmflags: Vec::new(),
            cflags: Vec::new(),
            cflags_c: Vec::new(),
            cflags_cc: Vec::new(),
            ldflags: Vec::new(),
            defines: Vec::new(),
            include_dirs: Vec::new(),
            libs: Vec::new(),
        }
    }

    /// Set the sources.
    pub fn with_sources(mut self, sources: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sources = sources.into_iter().map(|s| s.into()).collect();
        self
    }

    /// Set the dependencies.
    pub fn with_deps(mut self, deps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.deps = deps.into_iter().map(|d| d.into()).collect();
        self
    }

    /// Set the visibility patterns.
    pub fn with_visibility(
        mut self,
        patterns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.visibility = patterns.into_iter().map(|p| p.into()).collect();
        self
    }

    /// The public headers, before label resolution.
    pub fn public_headers(&self) -> Vec<&str> {
        match self.public {
            Public::All => self
                .sources
                .iter()
                .map(String::as_str)
                .filter(|s| is_header(s))
                .collect(),
            Public::Explicit(ref headers) => headers.iter().map(String::as_str).collect(),
        }
    }
}

/// Check if a path names a header file.
pub fn is_header(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |ext| HEADER_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_static_library() {
        let target: Target = serde_json::from_str(
            r#"{
                "type": "static_library",
                "toolchain": "//build/toolchain:clang",
                "sources": ["//foo/bar.cc", "//foo/bar.h"],
                "public": "*",
                "deps": ["//base:base"],
                "visibility": ["*"],
                "testonly": false,
                "cflags_cc": ["-std=c++17"],
                "include_dirs": ["//foo/include/"],
                "configs": ["//build/config:default"]
            }"#,
        )
        .unwrap();

        assert_eq!(target.kind, TargetType::StaticLibrary);
        assert_eq!(target.public, Public::All);
        assert_eq!(target.deps, vec!["//base:base"]);
        assert_eq!(target.cflags_cc, vec!["-std=c++17"]);
        assert_eq!(target.include_dirs, vec!["//foo/include/"]);
    }

    #[test]
    fn test_decode_explicit_public() {
        let target: Target =
            serde_json::from_str(r#"{"type": "source_set", "public": []}"#).unwrap();
        assert_eq!(target.public, Public::Explicit(Vec::new()));
        assert_ne!(target.public, Public::All);

        let target: Target =
            serde_json::from_str(r#"{"type": "source_set", "public": ["//a/b.h"]}"#).unwrap();
        assert_eq!(target.public, Public::Explicit(vec!["//a/b.h".to_string()]));
    }

    #[test]
    fn test_decode_missing_public_is_all() {
        let target: Target = serde_json::from_str(r#"{"type": "executable"}"#).unwrap();
        assert_eq!(target.public, Public::All);
        assert!(target.sources.is_empty());
    }

    #[test]
    fn test_decode_rejects_bad_public_sentinel() {
        let err = serde_json::from_str::<Target>(r#"{"type": "source_set", "public": "some"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("public"));
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        let err = serde_json::from_str::<Target>(r#"{"type": "shared_library"}"#).unwrap_err();
        assert!(err.to_string().contains("shared_library"));
    }

    #[test]
    fn test_decode_rejects_type_mismatch() {
        assert!(serde_json::from_str::<Target>(r#"{"type": "copy", "sources": 3}"#).is_err());
        assert!(serde_json::from_str::<Target>(r#"{"type": "copy", "deps": [1, 2]}"#).is_err());
    }

    #[test]
    fn test_public_headers() {
        let mut target = Target::new(TargetType::StaticLibrary)
            .with_sources(["//a/x.cc", "//a/x.h", "//a/y.hpp", "//a/z.inc"]);
        assert_eq!(target.public_headers(), vec!["//a/x.h", "//a/y.hpp"]);

        target.public = Public::Explicit(vec!["//a/x.h".to_string()]);
        assert_eq!(target.public_headers(), vec!["//a/x.h"]);
    }

    #[test]
    fn test_is_header() {
        assert!(is_header("foo/bar.h"));
        assert!(is_header("foo/bar.hh"));
        assert!(!is_header("foo/bar.cc"));
        assert!(!is_header("foo/h"));
    }
}

// SVG2Icon - core/model.rs
//
// Core data model types. Pure data definitions shared by every layer:
// target platforms, size specs, source SVG forms, generation results,
// download bundles, and the project record consumed by downloads.

use crate::util::constants;
use crate::util::error::{DownloadError, GenerationError};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// =============================================================================
// Target platform
// =============================================================================

/// One of the fixed output profiles. Each maps to exactly one size list
/// in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    Universal,
    Ios,
    Android,
    Desktop,
    Electron,
    Web,
}

impl TargetPlatform {
    /// Returns all variants in catalog order.
    pub fn all() -> &'static [TargetPlatform] {
        &[
            TargetPlatform::Universal,
            TargetPlatform::Ios,
            TargetPlatform::Android,
            TargetPlatform::Desktop,
            TargetPlatform::Electron,
            TargetPlatform::Web,
        ]
    }

    /// Lowercase identifier used on the command line, in manifests and in
    /// output directory names.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPlatform::Universal => "universal",
            TargetPlatform::Ios => "ios",
            TargetPlatform::Android => "android",
            TargetPlatform::Desktop => "desktop",
            TargetPlatform::Electron => "electron",
            TargetPlatform::Web => "web",
        }
    }

    /// Human-readable label for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetPlatform::Universal => "Universal",
            TargetPlatform::Ios => "iOS",
            TargetPlatform::Android => "Android",
            TargetPlatform::Desktop => "Desktop",
            TargetPlatform::Electron => "Electron",
            TargetPlatform::Web => "Web",
        }
    }

    /// One-line summary of what the target is for.
    pub fn description(&self) -> &'static str {
        match self {
            TargetPlatform::Universal => "Complete cross-platform package",
            TargetPlatform::Ios => "App Store ready",
            TargetPlatform::Android => "Google Play ready",
            TargetPlatform::Desktop => "Windows, macOS, Linux",
            TargetPlatform::Electron => "Electron app ready",
            TargetPlatform::Web => "PWA and web ready",
        }
    }

    /// Name of the output directory for this target: `<target>-icons`.
    pub fn output_dir_name(&self) -> String {
        format!("{}{}", self.as_str(), constants::TARGET_DIR_SUFFIX)
    }

    /// Whether the batch also packages `icon.ico` / `icon.icns`.
    pub fn wants_desktop_containers(&self) -> bool {
        matches!(self, TargetPlatform::Desktop | TargetPlatform::Electron)
    }

    /// Whether the batch also writes `favicon.ico` and the `<head>` snippet.
    pub fn wants_web_extras(&self) -> bool {
        matches!(self, TargetPlatform::Web)
    }
}

impl fmt::Display for TargetPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetPlatform {
    type Err = GenerationError;

    /// Parse a target name. Unknown names are rejected rather than mapped
    /// to `universal`, so typos surface at the boundary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        TargetPlatform::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| GenerationError::UnknownTarget {
                value: s.to_string(),
            })
    }
}

// =============================================================================
// Icon size spec
// =============================================================================

/// One (output name, pixel size) pair within a target's list.
///
/// `name` is a relative path fragment without extension; it may contain `/`
/// separated subdirectories (e.g. `mipmap-hdpi/ic_launcher`) but never `..`
/// and never a leading `/`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IconSizeSpec {
    /// Output base filename, relative to the target directory.
    pub name: &'static str,

    /// Square pixel size.
    pub size: u32,

    /// Informational density multiplier (iOS `@2x` etc.).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

impl IconSizeSpec {
    /// Spec without a density multiplier.
    pub const fn px(name: &'static str, size: u32) -> Self {
        Self {
            name,
            size,
            scale: None,
        }
    }

    /// Spec carrying a density multiplier.
    pub const fn scaled(name: &'static str, size: u32, scale: f32) -> Self {
        Self {
            name,
            size,
            scale: Some(scale),
        }
    }

    /// Output file name including the `.png` extension.
    pub fn file_name(&self) -> String {
        format!("{}.png", self.name)
    }

    /// Output path of this spec below `dir`, one component per `/` segment.
    pub fn output_path(&self, dir: &Path) -> PathBuf {
        let mut path = dir.to_path_buf();
        let mut segments = self.name.split('/').peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_some() {
                path.push(segment);
            } else {
                path.push(format!("{segment}.png"));
            }
        }
        path
    }
}

// =============================================================================
// Source SVG
// =============================================================================

/// Raw bytes of one SVG document, in any of the forms callers hold it in.
#[derive(Debug, Clone)]
pub enum SourceSvg {
    /// SVG file on disk.
    Path(PathBuf),

    /// Base64-encoded SVG content, optionally with a `data:` URL prefix.
    Base64(String),

    /// Already-loaded bytes.
    Bytes(Vec<u8>),
}

impl SourceSvg {
    /// Resolve the source into raw SVG bytes.
    pub fn load(&self) -> Result<Vec<u8>, GenerationError> {
        let bytes = match self {
            SourceSvg::Path(path) => std::fs::read(path).map_err(|e| GenerationError::Io {
                path: path.clone(),
                operation: "read SVG",
                source: e,
            })?,
            SourceSvg::Base64(data) => decode_base64_svg(data)?,
            SourceSvg::Bytes(bytes) => bytes.clone(),
        };

        if bytes.len() > constants::MAX_SVG_BYTES {
            return Err(GenerationError::SvgTooLarge {
                size: bytes.len(),
                max: constants::MAX_SVG_BYTES,
            });
        }
        Ok(bytes)
    }
}

/// Decode base64 SVG content. Accepts a `data:<mime>;base64,` prefix and
/// ignores embedded whitespace and line breaks.
pub fn decode_base64_svg(data: &str) -> Result<Vec<u8>, GenerationError> {
    let payload = match data.trim().split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => data,
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| GenerationError::InvalidBase64 { source: e })
}

/// Encode raw SVG bytes in the base64 form stored on project records.
pub fn encode_base64_svg(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

// =============================================================================
// Generation result
// =============================================================================

/// Outcome of one `generate(target)` call.
///
/// `success` stays true when individual sizes fail; those failures are
/// listed in `errors`. It is false only when the call itself failed or when
/// not a single size could be produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub success: bool,
    pub message: String,
    pub output_path: Option<PathBuf>,
    pub files_generated: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl GenerationResult {
    /// Result for a call that failed before producing anything.
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            errors: Some(vec![message.clone()]),
            message,
            output_path: None,
            files_generated: 0,
        }
    }

    /// All error strings, empty when there were none.
    pub fn error_list(&self) -> &[String] {
        self.errors.as_deref().unwrap_or(&[])
    }
}

// =============================================================================
// Download bundles
// =============================================================================

/// User-facing download grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleType {
    All,
    Mobile,
    Desktop,
    Web,
    Original,
}

impl BundleType {
    /// Returns all variants in display order.
    pub fn all() -> &'static [BundleType] {
        &[
            BundleType::All,
            BundleType::Mobile,
            BundleType::Desktop,
            BundleType::Web,
            BundleType::Original,
        ]
    }

    /// Lowercase identifier used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleType::All => "all",
            BundleType::Mobile => "mobile",
            BundleType::Desktop => "desktop",
            BundleType::Web => "web",
            BundleType::Original => "original",
        }
    }

    /// Label used in the bundle file name.
    pub fn label(&self) -> &'static str {
        match self {
            BundleType::All => "All",
            BundleType::Mobile => "Mobile",
            BundleType::Desktop => "Desktop",
            BundleType::Web => "Web",
            BundleType::Original => "SVG",
        }
    }

    /// Targets that must be generated before the bundle is staged.
    pub fn targets(&self) -> &'static [TargetPlatform] {
        match self {
            BundleType::All => &[
                TargetPlatform::Web,
                TargetPlatform::Desktop,
                TargetPlatform::Ios,
                TargetPlatform::Android,
            ],
            BundleType::Mobile => &[TargetPlatform::Ios, TargetPlatform::Android],
            BundleType::Desktop => &[TargetPlatform::Desktop],
            BundleType::Web => &[TargetPlatform::Web],
            BundleType::Original => &[],
        }
    }

    /// Whether the bundle carries `svg/<name>.svg`.
    pub fn includes_svg(&self) -> bool {
        matches!(self, BundleType::All | BundleType::Original)
    }
}

impl fmt::Display for BundleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BundleType {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        BundleType::all()
            .iter()
            .copied()
            .find(|b| b.as_str() == wanted)
            .ok_or_else(|| DownloadError::UnknownBundle {
                value: s.to_string(),
            })
    }
}

// =============================================================================
// Project
// =============================================================================

/// The slice of a project record that generation and downloads need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Stable identifier; also the name of the project's output directory.
    pub id: String,

    /// Display name, used for bundle and SVG file names.
    pub name: String,

    /// Base64-encoded SVG content.
    pub svg_data: String,
}

impl Project {
    /// Build a project from raw SVG bytes. The id is derived from the name.
    pub fn new(name: &str, svg: &[u8]) -> Self {
        Self {
            id: slugify(name),
            name: name.trim().to_string(),
            svg_data: encode_base64_svg(svg),
        }
    }

    /// Source SVG in the stored base64 form.
    pub fn source(&self) -> SourceSvg {
        SourceSvg::Base64(self.svg_data.clone())
    }
}

/// Lowercase `[a-z0-9_]` identifier: runs of other characters collapse to a
/// single underscore, leading/trailing underscores are dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        constants::FALLBACK_NAME.to_string()
    } else {
        slug.to_string()
    }
}

/// Strip characters that are invalid in file names on any supported OS,
/// collapse whitespace runs, and cap the length.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !constants::FORBIDDEN_NAME_CHARS.contains(c) && !c.is_control())
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let capped: String = trimmed.chars().take(constants::MAX_NAME_LENGTH).collect();
    let capped = capped.trim_end();
    if capped.is_empty() {
        constants::FALLBACK_NAME.to_string()
    } else {
        capped.to_string()
    }
}

// SVG2Icon - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all SVG2Icon operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum Svg2IconError {
    /// A single raster could not be produced.
    Rasterize(RasterizeError),

    /// A batch generation call failed before or outside the per-size loop.
    Generation(GenerationError),

    /// An external converter or archiver could not be used.
    Tool(ToolError),

    /// Bundle assembly failed.
    Download(DownloadError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for Svg2IconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rasterize(e) => write!(f, "Rasterization error: {e}"),
            Self::Generation(e) => write!(f, "Generation error: {e}"),
            Self::Tool(e) => write!(f, "Tool error: {e}"),
            Self::Download(e) => write!(f, "Download error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for Svg2IconError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rasterize(e) => Some(e),
            Self::Generation(e) => Some(e),
            Self::Tool(e) => Some(e),
            Self::Download(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Rasterization errors
// ---------------------------------------------------------------------------

/// Errors produced while turning one SVG into one PNG at one size.
#[derive(Debug)]
pub enum RasterizeError {
    /// Requested width is zero or above the supported maximum.
    InvalidSize { size: u32, max: u32 },

    /// The document is not valid SVG/XML.
    Parse {
        size: u32,
        source: resvg::usvg::Error,
    },

    /// The target pixmap is too large or could not be allocated.
    Render { size: u32, width: u32, height: u32 },

    /// The rendered pixmap could not be encoded as PNG.
    Encode { size: u32, reason: String },
}

impl fmt::Display for RasterizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { size, max } => {
                write!(f, "Invalid raster width {size}px (must be 1-{max})")
            }
            Self::Parse { size, source } => {
                write!(f, "Cannot parse SVG for {size}px render: {source}")
            }
            Self::Render {
                size,
                width,
                height,
            } => write!(
                f,
                "Cannot allocate {width}x{height} canvas for {size}px render"
            ),
            Self::Encode { size, reason } => {
                write!(f, "Cannot encode {size}px render as PNG: {reason}")
            }
        }
    }
}

impl std::error::Error for RasterizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RasterizeError> for Svg2IconError {
    fn from(e: RasterizeError) -> Self {
        Self::Rasterize(e)
    }
}

// ---------------------------------------------------------------------------
// Generation errors
// ---------------------------------------------------------------------------

/// Call-level failures of a batch generation.
///
/// Per-size failures are never represented here; they are collected as
/// strings in `GenerationResult::errors`.
#[derive(Debug)]
pub enum GenerationError {
    /// The requested target platform name is not in the catalog.
    UnknownTarget { value: String },

    /// The base64 form of the source SVG could not be decoded.
    InvalidBase64 { source: base64::DecodeError },

    /// The source SVG exceeds the maximum accepted size.
    SvgTooLarge { size: usize, max: usize },

    /// The output directory or a source file could not be accessed.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTarget { value } => write!(
                f,
                "Unknown icon type '{value}'. \
                 Expected one of: universal, ios, android, desktop, electron, web"
            ),
            Self::InvalidBase64 { source } => {
                write!(f, "SVG data is not valid base64: {source}")
            }
            Self::SvgTooLarge { size, max } => {
                write!(f, "SVG is {size} bytes, exceeds maximum of {max} bytes")
            }
            Self::Io {
                path,
                operation,
                source,
            } => write!(f, "Cannot {operation} '{}': {source}", path.display()),
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidBase64 { source } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<GenerationError> for Svg2IconError {
    fn from(e: GenerationError) -> Self {
        Self::Generation(e)
    }
}

// ---------------------------------------------------------------------------
// External tool errors
// ---------------------------------------------------------------------------

/// Failures running an optional external converter or archiver.
///
/// These are logged and treated as "tool unavailable"; they never fail a batch.
#[derive(Debug)]
pub enum ToolError {
    /// None of the candidate executables was found on PATH.
    NotFound { tool: &'static str },

    /// The process could not be started.
    Spawn { tool: String, source: io::Error },

    /// The process exited unsuccessfully.
    Failed { tool: String, code: Option<i32> },

    /// The process did not finish in time and was killed.
    TimedOut { tool: String, timeout_secs: u64 },

    /// The process reported success but left no usable output behind.
    NoOutput { tool: String, path: PathBuf },

    /// Staging inputs for the tool failed.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { tool } => write!(f, "'{tool}' not found on PATH"),
            Self::Spawn { tool, source } => write!(f, "Failed to start '{tool}': {source}"),
            Self::Failed { tool, code } => match code {
                Some(code) => write!(f, "'{tool}' exited with status {code}"),
                None => write!(f, "'{tool}' was terminated by a signal"),
            },
            Self::TimedOut { tool, timeout_secs } => {
                write!(f, "'{tool}' did not finish within {timeout_secs}s and was killed")
            }
            Self::NoOutput { tool, path } => write!(
                f,
                "'{tool}' produced no output at '{}'",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "Cannot prepare '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ToolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ToolError> for Svg2IconError {
    fn from(e: ToolError) -> Self {
        Self::Tool(e)
    }
}

// ---------------------------------------------------------------------------
// Download errors
// ---------------------------------------------------------------------------

/// Errors related to assembling a download bundle.
#[derive(Debug)]
pub enum DownloadError {
    /// The requested bundle name is not one of the known bundles.
    UnknownBundle { value: String },

    /// The source SVG of the project could not be decoded.
    Source(GenerationError),

    /// Generating one of the bundle's targets failed outright.
    Generation { target: String, message: String },

    /// No archiver could compress the staging directory.
    NoArchiver { staging: PathBuf },

    /// Filesystem error while staging or writing the bundle.
    Io { path: PathBuf, source: io::Error },

    /// Directory traversal failed while copying or archiving.
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// The in-process zip writer failed.
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownBundle { value } => write!(
                f,
                "Unknown bundle '{value}'. Expected one of: all, mobile, desktop, web, original"
            ),
            Self::Source(e) => write!(f, "Project SVG is unusable: {e}"),
            Self::Generation { target, message } => {
                write!(f, "Generating '{target}' icons failed: {message}")
            }
            Self::NoArchiver { staging } => write!(
                f,
                "No compression tool could archive '{}'. \
                 Install zip, 7z or Python, or enable [download] builtin_zip.",
                staging.display()
            ),
            Self::Io { path, source } => {
                write!(f, "Download I/O error '{}': {source}", path.display())
            }
            Self::Walk { path, source } => {
                write!(f, "Error traversing '{}': {source}", path.display())
            }
            Self::Zip { path, source } => {
                write!(f, "Zip error writing '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DownloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(e) => Some(e),
            Self::Io { source, .. } => Some(source),
            Self::Walk { source, .. } => Some(source),
            Self::Zip { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DownloadError> for Svg2IconError {
    fn from(e: DownloadError) -> Self {
        Self::Download(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for Svg2IconError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for SVG2Icon results.
pub type Result<T> = std::result::Result<T, Svg2IconError>;

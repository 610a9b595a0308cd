// SVG2Icon - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "SVG2Icon";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "svg2icon";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Suffix appended to every download bundle name.
pub const BUNDLE_SUFFIX: &str = "svg2icon";

// =============================================================================
// Output layout
// =============================================================================

/// Suffix of each per-target output directory (`<target>-icons`).
pub const TARGET_DIR_SUFFIX: &str = "-icons";

/// Manifest written at the end of every batch.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Copy of the source SVG written next to the manifest.
pub const ORIGINAL_SVG_FILE_NAME: &str = "original.svg";

/// Windows multi-resolution icon.
pub const ICO_FILE_NAME: &str = "icon.ico";

/// macOS multi-resolution icon.
pub const ICNS_FILE_NAME: &str = "icon.icns";

/// Browser favicon container.
pub const FAVICON_FILE_NAME: &str = "favicon.ico";

/// `<head>` snippet listing the web icons.
pub const HEAD_HTML_FILE_NAME: &str = "icons-head.html";

/// Setup notes written for desktop and electron targets.
pub const README_FILE_NAME: &str = "README.md";

/// Subdirectory of the data directory holding per-project output.
pub const PROJECTS_DIR_NAME: &str = "projects";

/// Config file name, located one level above the platform config dir.
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Container size lists
// =============================================================================

/// Layers rendered into `icon.ico`. ICO entries cannot exceed 256 px.
pub const ICO_SIZES: &[u32] = &[16, 24, 32, 48, 64, 128, 256];

/// Layers rendered into `icon.icns`.
pub const ICNS_SIZES: &[u32] = &[16, 32, 64, 128, 256, 512, 1024];

/// Layers rendered into `favicon.ico`.
pub const FAVICON_SIZES: &[u32] = &[16, 32];

/// Apple `.iconset` member names and the pixel size each one holds.
pub const ICONSET_MEMBERS: &[(&str, u32)] = &[
    ("icon_16x16.png", 16),
    ("icon_16x16@2x.png", 32),
    ("icon_32x32.png", 32),
    ("icon_32x32@2x.png", 64),
    ("icon_128x128.png", 128),
    ("icon_128x128@2x.png", 256),
    ("icon_256x256.png", 256),
    ("icon_256x256@2x.png", 512),
    ("icon_512x512.png", 512),
    ("icon_512x512@2x.png", 1024),
];

// =============================================================================
// Rasterisation limits
// =============================================================================

/// Largest raster side accepted by the rasterizer, applied to the requested
/// width and to the height derived from the aspect ratio. The catalog tops out at 1024.
pub const MAX_RASTER_WIDTH: u32 = 8_192;

/// Largest SVG document accepted as input.
pub const MAX_SVG_BYTES: usize = 32 * 1024 * 1024; // 32 MB

// =============================================================================
// External tools
// =============================================================================

/// Default timeout for every spawned converter / archiver process.
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 60;

/// Minimum user-configurable tool timeout.
pub const MIN_TOOL_TIMEOUT_SECS: u64 = 1;

/// Maximum user-configurable tool timeout.
pub const MAX_TOOL_TIMEOUT_SECS: u64 = 600;

/// How often a running child process is polled for exit (ms).
pub const TOOL_POLL_INTERVAL_MS: u64 = 25;

// =============================================================================
// Naming
// =============================================================================

/// Characters stripped from user-supplied names before they touch the filesystem.
pub const FORBIDDEN_NAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Maximum length of a sanitised project name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Name used when sanitising leaves nothing behind.
pub const FALLBACK_NAME: &str = "untitled";

// =============================================================================
// Logging
// =============================================================================

/// Default log level when neither RUST_LOG, --debug, nor config set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

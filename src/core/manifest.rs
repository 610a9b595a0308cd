// SVG2Icon - core/manifest.rs
//
// `manifest.json` describing a generated output directory, plus the copy of
// the source SVG that makes the directory self-contained.

use crate::core::model::{IconSizeSpec, TargetPlatform};
use crate::util::constants;
use crate::util::error::GenerationError;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Description of one output directory. Fully replaced on every batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// ISO-8601 UTC timestamp of the batch.
    pub generated: String,

    pub icon_type: TargetPlatform,

    /// Always true: `original.svg` is written next to the manifest.
    pub svg_data_included: bool,

    pub icons: Vec<ManifestIcon>,

    pub additional_files: Vec<AdditionalFile>,
}

/// One PNG listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestIcon {
    /// Relative file name including `.png`.
    pub name: String,

    /// `"<px>x<px>"`.
    pub size: String,

    #[serde(rename = "type")]
    pub kind: String,
}

/// A non-PNG file present in the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalFile {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub description: String,
}

/// Extra files recognised in an output directory: (file, type, description).
const KNOWN_EXTRAS: &[(&str, &str, &str)] = &[
    (constants::ICO_FILE_NAME, "ico", "Windows icon file"),
    (constants::ICNS_FILE_NAME, "icns", "macOS icon file"),
    (
        constants::FAVICON_FILE_NAME,
        "ico",
        "Browser favicon (16x16 and 32x32)",
    ),
    (
        constants::HEAD_HTML_FILE_NAME,
        "html",
        "Link tags to paste into the site <head>",
    ),
    (
        constants::README_FILE_NAME,
        "documentation",
        "Setup instructions and manual conversion options",
    ),
];

impl Manifest {
    /// Manifest for `specs`, stamped with the current time and no extras.
    pub fn new(target: TargetPlatform, specs: &[IconSizeSpec]) -> Self {
        Self {
            generated: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            icon_type: target,
            svg_data_included: true,
            icons: specs
                .iter()
                .map(|spec| ManifestIcon {
                    name: spec.file_name(),
                    size: format!("{0}x{0}", spec.size),
                    kind: "png".to_string(),
                })
                .collect(),
            additional_files: Vec::new(),
        }
    }

    /// Record every known extra file that exists in `dir`.
    pub fn detect_additional_files(&mut self, dir: &Path) {
        self.additional_files = KNOWN_EXTRAS
            .iter()
            .filter(|(file, _, _)| dir.join(file).is_file())
            .map(|(file, kind, description)| AdditionalFile {
                name: (*file).to_string(),
                kind: (*kind).to_string(),
                description: (*description).to_string(),
            })
            .collect();
    }
}

/// Write `manifest.json` and `original.svg` into `dir`, replacing any
/// previous versions. Returns the manifest that was written.
pub fn write_manifest(
    dir: &Path,
    target: TargetPlatform,
    specs: &[IconSizeSpec],
    svg: &[u8],
) -> Result<Manifest, GenerationError> {
    let mut manifest = Manifest::new(target, specs);
    manifest.detect_additional_files(dir);

    let manifest_path = dir.join(constants::MANIFEST_FILE_NAME);
    let json = serde_json::to_string_pretty(&manifest).map_err(|e| GenerationError::Io {
        path: manifest_path.clone(),
        operation: "serialise manifest",
        source: e.into(),
    })?;
    std::fs::write(&manifest_path, json).map_err(|e| GenerationError::Io {
        path: manifest_path.clone(),
        operation: "write manifest",
        source: e,
    })?;

    let svg_path = dir.join(constants::ORIGINAL_SVG_FILE_NAME);
    std::fs::write(&svg_path, svg).map_err(|e| GenerationError::Io {
        path: svg_path.clone(),
        operation: "write original SVG",
        source: e,
    })?;

    tracing::debug!(
        path = %manifest_path.display(),
        icons = manifest.icons.len(),
        extras = manifest.additional_files.len(),
        "Manifest written"
    );

    Ok(manifest)
}

/// Read a previously written manifest back from `dir`.
pub fn read_manifest(dir: &Path) -> Result<Manifest, GenerationError> {
    let path = dir.join(constants::MANIFEST_FILE_NAME);
    let content = std::fs::read_to_string(&path).map_err(|e| GenerationError::Io {
        path: path.clone(),
        operation: "read manifest",
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| GenerationError::Io {
        path,
        operation: "parse manifest",
        source: e.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog;

    #[test]
    fn test_icon_entries_mirror_specs() {
        let manifest = Manifest::new(TargetPlatform::Android, catalog::icon_sizes(TargetPlatform::Android));
        assert_eq!(manifest.icons.len(), 7);
        assert_eq!(
            manifest.icons[2],
            ManifestIcon {
                name: "mipmap-hdpi/ic_launcher.png".to_string(),
                size: "72x72".to_string(),
                kind: "png".to_string(),
            }
        );
    }

    #[test]
    fn test_json_field_names() {
        let manifest = Manifest::new(TargetPlatform::Web, &[IconSizeSpec::px("favicon-16", 16)]);
        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["iconType"], "web");
        assert_eq!(json["svgDataIncluded"], true);
        assert_eq!(json["icons"][0]["type"], "png");
        assert!(json["additionalFiles"].as_array().unwrap().is_empty());
        assert!(json["generated"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_detects_only_existing_extras() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("icon.ico"), b"ico").unwrap();
        std::fs::write(dir.path().join("README.md"), b"# readme").unwrap();

        let mut manifest = Manifest::new(TargetPlatform::Desktop, &[]);
        manifest.detect_additional_files(dir.path());
        let names: Vec<&str> = manifest
            .additional_files
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["icon.ico", "README.md"]);
        assert_eq!(manifest.additional_files[1].kind, "documentation");
    }

    #[test]
    fn test_write_then_read_keeps_svg_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let svg = b"<svg xmlns=\"http://www.w3.org/2000/svg\">\xc3\xa9</svg>";
        let specs = catalog::icon_sizes(TargetPlatform::Ios);

        let written = write_manifest(dir.path(), TargetPlatform::Ios, specs, svg).unwrap();
        let read = read_manifest(dir.path()).unwrap();
        assert_eq!(written, read);
        assert_eq!(std::fs::read(dir.path().join("original.svg")).unwrap(), svg);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let err = write_manifest(
            Path::new("/nonexistent/svg2icon/out"),
            TargetPlatform::Web,
            &[],
            b"<svg/>",
        )
        .unwrap_err();
        assert!(matches!(err, GenerationError::Io { operation: "write manifest", .. }));
    }
}

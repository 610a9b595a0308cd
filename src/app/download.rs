// SVG2Icon - app/download.rs
//
// Download bundles: regenerate the bundle's targets, stage the output in a
// temporary folder laid out per bundle, and compress it to a .zip.
//
// Compression tries each archiver in order until one produces the file.
// The staging folder is removed whether or not compression succeeded.

use crate::app::generator::Generator;
use crate::core::model::{sanitize_file_name, BundleType, Project, TargetPlatform};
use crate::platform::config::AppConfig;
use crate::platform::{fs, tools};
use crate::util::constants;
use crate::util::error::{self, DownloadError, Svg2IconError, ToolError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

// =============================================================================
// Archivers
// =============================================================================

/// Compresses the contents of a staging folder into a zip file.
pub trait Archiver {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Write `zip_path` containing the contents of `staging` at its root.
    fn archive(&self, staging: &Path, zip_path: &Path) -> error::Result<()>;
}

/// In-process writer backed by the `zip` crate.
pub struct ZipArchiver;

impl Archiver for ZipArchiver {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn archive(&self, staging: &Path, zip_path: &Path) -> error::Result<()> {
        let zip_err = |e: zip::result::ZipError| DownloadError::Zip {
            path: zip_path.to_path_buf(),
            source: e,
        };
        let io_err = |path: &Path, e: std::io::Error| DownloadError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        let file = std::fs::File::create(zip_path).map_err(|e| io_err(zip_path, e))?;
        let mut zip = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for entry in WalkDir::new(staging).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| DownloadError::Walk {
                path: staging.to_path_buf(),
                source: e,
            })?;
            let relative = match entry.path().strip_prefix(staging) {
                Ok(r) => r.to_string_lossy().replace('\\', "/"),
                Err(_) => continue,
            };

            if entry.file_type().is_dir() {
                zip.add_directory(relative, options).map_err(zip_err)?;
            } else if entry.file_type().is_file() {
                let bytes = std::fs::read(entry.path()).map_err(|e| io_err(entry.path(), e))?;
                zip.start_file(relative, options).map_err(zip_err)?;
                zip.write_all(&bytes).map_err(|e| io_err(zip_path, e))?;
            }
        }

        zip.finish().map_err(zip_err)?;
        Ok(())
    }
}

/// PowerShell `Compress-Archive`. Windows only.
pub struct PowerShellArchiver {
    timeout: Duration,
}

impl Archiver for PowerShellArchiver {
    fn name(&self) -> &'static str {
        "powershell"
    }

    fn archive(&self, staging: &Path, zip_path: &Path) -> error::Result<()> {
        if !cfg!(windows) {
            return Err(ToolError::NotFound { tool: "powershell" }.into());
        }
        let (tool, exe) = tools::find_tool(&["powershell", "pwsh"])
            .ok_or(ToolError::NotFound { tool: "powershell" })?;
        let script = format!(
            "Compress-Archive -Path '{}' -DestinationPath '{}' -Force",
            staging.join("*").display().to_string().replace('\'', "''"),
            zip_path.display().to_string().replace('\'', "''"),
        );
        let mut cmd = Command::new(exe);
        cmd.args(["-NoProfile", "-NonInteractive", "-Command", script.as_str()]);
        tools::run_with_timeout(&mut cmd, tool, self.timeout)?;
        Ok(())
    }
}

/// Info-ZIP `zip -r`.
pub struct ZipCliArchiver {
    timeout: Duration,
}

impl Archiver for ZipCliArchiver {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn archive(&self, staging: &Path, zip_path: &Path) -> error::Result<()> {
        let (tool, exe) = tools::find_tool(&["zip"]).ok_or(ToolError::NotFound { tool: "zip" })?;
        let mut cmd = Command::new(exe);
        cmd.current_dir(staging).args(["-r", "-q"]).arg(zip_path).arg(".");
        tools::run_with_timeout(&mut cmd, tool, self.timeout)?;
        Ok(())
    }
}

/// 7-Zip in zip mode.
pub struct SevenZipArchiver {
    timeout: Duration,
}

impl Archiver for SevenZipArchiver {
    fn name(&self) -> &'static str {
        "7z"
    }

    fn archive(&self, staging: &Path, zip_path: &Path) -> error::Result<()> {
        let (tool, exe) =
            tools::find_tool(&["7z", "7za"]).ok_or(ToolError::NotFound { tool: "7z" })?;
        let mut cmd = Command::new(exe);
        cmd.current_dir(staging)
            .args(["a", "-tzip", "-y"])
            .arg(zip_path)
            .arg("*");
        tools::run_with_timeout(&mut cmd, tool, self.timeout)?;
        Ok(())
    }
}

/// Python's `shutil.make_archive`.
pub struct PythonArchiver {
    timeout: Duration,
}

impl Archiver for PythonArchiver {
    fn name(&self) -> &'static str {
        "python"
    }

    fn archive(&self, staging: &Path, zip_path: &Path) -> error::Result<()> {
        let (tool, exe) = tools::find_tool(&["python3", "python"])
            .ok_or(ToolError::NotFound { tool: "python" })?;
        // make_archive appends ".zip" itself.
        let base = zip_path.with_extension("");
        let mut cmd = Command::new(exe);
        cmd.arg("-c")
            .arg("import shutil, sys; shutil.make_archive(sys.argv[1], 'zip', sys.argv[2])")
            .arg(&base)
            .arg(staging);
        tools::run_with_timeout(&mut cmd, tool, self.timeout)?;
        Ok(())
    }
}

/// Archiver cascade: builtin writer (when enabled), then external tools.
pub fn default_archivers(builtin_zip: bool, timeout: Duration) -> Vec<Box<dyn Archiver>> {
    let mut archivers: Vec<Box<dyn Archiver>> = Vec::new();
    if builtin_zip {
        archivers.push(Box::new(ZipArchiver));
    }
    archivers.push(Box::new(PowerShellArchiver { timeout }));
    archivers.push(Box::new(ZipCliArchiver { timeout }));
    archivers.push(Box::new(SevenZipArchiver { timeout }));
    archivers.push(Box::new(PythonArchiver { timeout }));
    archivers
}

// =============================================================================
// Assembler
// =============================================================================

/// `"<name> - <label> - svg2icon"`, safe to use as a file name.
pub fn bundle_name(project_name: &str, bundle: BundleType) -> String {
    sanitize_file_name(&format!(
        "{} - {} - {}",
        sanitize_file_name(project_name),
        bundle.label(),
        constants::BUNDLE_SUFFIX
    ))
}

/// Folder a target's output occupies inside a bundle.
fn staged_dir(target: TargetPlatform) -> PathBuf {
    match target {
        TargetPlatform::Ios | TargetPlatform::Android => {
            Path::new("mobile").join(target.output_dir_name())
        }
        other => PathBuf::from(other.as_str()),
    }
}

/// Builds download bundles for projects.
pub struct DownloadAssembler {
    generator: Generator,
    projects_dir: PathBuf,
    archivers: Vec<Box<dyn Archiver>>,
}

impl DownloadAssembler {
    pub fn new(
        generator: Generator,
        projects_dir: PathBuf,
        archivers: Vec<Box<dyn Archiver>>,
    ) -> Self {
        Self {
            generator,
            projects_dir,
            archivers,
        }
    }

    pub fn from_config(config: &AppConfig, projects_dir: PathBuf) -> Self {
        Self::new(
            Generator::from_config(config),
            projects_dir,
            default_archivers(config.builtin_zip, config.tool_timeout),
        )
    }

    /// Output base of a project: `<projects_dir>/<id>/`.
    pub fn project_output_dir(&self, project: &Project) -> PathBuf {
        self.projects_dir.join(&project.id)
    }

    /// Regenerate the bundle's targets and write `<dest_dir>/<bundle name>.zip`,
    /// adding ` (n)` when that name is taken. Returns the zip path.
    pub fn assemble(
        &self,
        project: &Project,
        bundle: BundleType,
        dest_dir: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let svg = project.source().load().map_err(DownloadError::Source)?;
        let output_base = self.project_output_dir(project);

        // Always regenerated; nothing is cached between downloads.
        for &target in bundle.targets() {
            let result = self.generator.generate(&svg, &output_base, target);
            if !result.success {
                return Err(DownloadError::Generation {
                    target: target.to_string(),
                    message: result.message,
                });
            }
        }

        let name = bundle_name(&project.name, bundle);
        let staging_root = tempfile::Builder::new()
            .prefix("svg2icon-bundle-")
            .tempdir()
            .map_err(|e| DownloadError::Io {
                path: std::env::temp_dir(),
                source: e,
            })?;
        let staging = staging_root.path().join(&name);

        let outcome = self
            .stage(project, bundle, &svg, &output_base, &staging)
            .and_then(|()| self.compress(&staging, dest_dir, &name));

        let staging_path = staging_root.path().to_path_buf();
        if let Err(e) = staging_root.close() {
            tracing::warn!(path = %staging_path.display(), error = %e, "Could not remove staging folder");
        }

        match &outcome {
            Ok(zip_path) => tracing::info!(
                project = %project.id,
                bundle = %bundle,
                zip = %zip_path.display(),
                "Bundle written"
            ),
            Err(e) => tracing::error!(project = %project.id, bundle = %bundle, error = %e, "Bundle failed"),
        }
        outcome
    }

    fn stage(
        &self,
        project: &Project,
        bundle: BundleType,
        svg: &[u8],
        output_base: &Path,
        staging: &Path,
    ) -> Result<(), DownloadError> {
        std::fs::create_dir_all(staging).map_err(|e| DownloadError::Io {
            path: staging.to_path_buf(),
            source: e,
        })?;

        for &target in bundle.targets() {
            let src = output_base.join(target.output_dir_name());
            let dest = staging.join(staged_dir(target));
            let copied = fs::copy_dir_recursive(&src, &dest)
                .map_err(|e| DownloadError::Io { path: src, source: e })?;
            tracing::debug!(target_platform = %target, files = copied, "Target staged");
        }

        if bundle.includes_svg() {
            let path = staging
                .join("svg")
                .join(format!("{}.svg", sanitize_file_name(&project.name)));
            fs::write_creating_dirs(&path, svg)
                .map_err(|e| DownloadError::Io { path, source: e })?;
        }
        Ok(())
    }

    fn compress(&self, staging: &Path, dest_dir: &Path, name: &str) -> Result<PathBuf, DownloadError> {
        let io_err = |e| DownloadError::Io {
            path: dest_dir.to_path_buf(),
            source: e,
        };
        std::fs::create_dir_all(dest_dir).map_err(io_err)?;
        // CLI archivers run inside the staging folder, so the target must be absolute.
        let dest_dir = if dest_dir.is_absolute() {
            dest_dir.to_path_buf()
        } else {
            std::env::current_dir().map_err(io_err)?.join(dest_dir)
        };
        let zip_path = fs::unique_path(&dest_dir.join(format!("{name}.zip")));

        for archiver in &self.archivers {
            match archiver.archive(staging, &zip_path) {
                Ok(()) if zip_path.is_file() => {
                    tracing::debug!(archiver = archiver.name(), "Bundle compressed");
                    return Ok(zip_path);
                }
                Ok(()) => {
                    tracing::warn!(archiver = archiver.name(), "Archiver reported success but wrote nothing");
                }
                Err(Svg2IconError::Tool(ToolError::NotFound { tool })) => {
                    tracing::debug!(archiver = archiver.name(), tool, "Archiver not available");
                }
                Err(e) => {
                    tracing::warn!(archiver = archiver.name(), error = %e, "Archiver failed");
                }
            }
            // Don't leave a half-written archive for the next archiver to trip over.
            let _ = std::fs::remove_file(&zip_path);
        }

        Err(DownloadError::NoArchiver {
            staging: staging.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::generator::tests::fake_generator;
    use std::io::Read;

    const SVG: &[u8] = b"<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 10 10\"/>";

    fn assembler(projects: &Path, archivers: Vec<Box<dyn Archiver>>) -> DownloadAssembler {
        DownloadAssembler::new(fake_generator(&[]), projects.to_path_buf(), archivers)
    }

    fn entry_names(zip_path: &Path) -> Vec<String> {
        let file = std::fs::File::open(zip_path).unwrap();
        let archive = zip::ZipArchive::new(file).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn test_bundle_name_is_sanitised() {
        assert_eq!(bundle_name("My App", BundleType::Mobile), "My App - Mobile - svg2icon");
        assert_eq!(bundle_name("a/b:c*", BundleType::Original), "abc - SVG - svg2icon");
    }

    #[test]
    fn test_mobile_bundle_layout() {
        let projects = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let project = Project::new("Logo", SVG);

        let zip_path = assembler(projects.path(), vec![Box::new(ZipArchiver)])
            .assemble(&project, BundleType::Mobile, dest.path())
            .unwrap();

        assert_eq!(zip_path, dest.path().join("Logo - Mobile - svg2icon.zip"));
        let names = entry_names(&zip_path);
        assert!(names.contains(&"mobile/ios-icons/icon-20@1x.png".to_string()), "{names:?}");
        assert!(names.contains(&"mobile/android-icons/mipmap-hdpi/ic_launcher.png".to_string()));
        assert!(names.contains(&"mobile/android-icons/manifest.json".to_string()));
        assert!(!names.iter().any(|n| n.starts_with("web/") || n.starts_with("svg/")));

        // Generated output stays under the project's directory.
        assert!(projects.path().join("logo/ios-icons/manifest.json").is_file());
    }

    #[test]
    fn test_original_bundle_carries_svg_only() {
        let projects = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let project = Project::new("Logo", SVG);

        let zip_path = assembler(projects.path(), vec![Box::new(ZipArchiver)])
            .assemble(&project, BundleType::Original, dest.path())
            .unwrap();

        let file = std::fs::File::open(&zip_path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut svg = Vec::new();
        archive
            .by_name("svg/Logo.svg")
            .unwrap()
            .read_to_end(&mut svg)
            .unwrap();
        assert_eq!(svg, SVG);
        assert!(!projects.path().join("logo").exists());
    }

    #[test]
    fn test_all_bundle_has_every_section() {
        let projects = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let project = Project::new("Logo", SVG);

        let zip_path = assembler(projects.path(), vec![Box::new(ZipArchiver)])
            .assemble(&project, BundleType::All, dest.path())
            .unwrap();

        let names = entry_names(&zip_path);
        for expected in [
            "web/favicon-16.png",
            "desktop/icon-1024.png",
            "mobile/ios-icons/icon-1024@1x.png",
            "mobile/android-icons/playstore-icon.png",
            "svg/Logo.svg",
        ] {
            assert!(names.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn test_name_collision_appends_counter() {
        let projects = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let project = Project::new("Logo", SVG);
        let assembler = assembler(projects.path(), vec![Box::new(ZipArchiver)]);

        let first = assembler.assemble(&project, BundleType::Web, dest.path()).unwrap();
        let second = assembler.assemble(&project, BundleType::Web, dest.path()).unwrap();
        assert_eq!(first, dest.path().join("Logo - Web - svg2icon.zip"));
        assert_eq!(second, dest.path().join("Logo - Web - svg2icon (0).zip"));
    }

    #[test]
    fn test_no_archiver_is_error_and_staging_is_removed() {
        let projects = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let project = Project::new("Logo", SVG);

        let err = assembler(projects.path(), Vec::new())
            .assemble(&project, BundleType::Web, dest.path())
            .unwrap_err();
        match err {
            DownloadError::NoArchiver { staging } => assert!(!staging.exists()),
            other => panic!("expected NoArchiver, got {other:?}"),
        }
        assert_eq!(std::fs::read_dir(dest.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_archiver_cascade_falls_through() {
        struct Failing;
        impl Archiver for Failing {
            fn name(&self) -> &'static str {
                "failing"
            }
            fn archive(&self, _staging: &Path, zip_path: &Path) -> error::Result<()> {
                std::fs::write(zip_path, b"partial").unwrap();
                Err(ToolError::Failed {
                    tool: "failing".to_string(),
                    code: Some(2),
                }
                .into())
            }
        }

        let projects = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let project = Project::new("Logo", SVG);

        let zip_path = assembler(projects.path(), vec![Box::new(Failing), Box::new(ZipArchiver)])
            .assemble(&project, BundleType::Original, dest.path())
            .unwrap();
        assert!(entry_names(&zip_path).contains(&"svg/Logo.svg".to_string()));
    }

    #[test]
    fn test_undecodable_project_svg() {
        let projects = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let project = Project {
            id: "broken".to_string(),
            name: "Broken".to_string(),
            svg_data: "%%%".to_string(),
        };

        let err = assembler(projects.path(), vec![Box::new(ZipArchiver)])
            .assemble(&project, BundleType::Web, dest.path())
            .unwrap_err();
        assert!(matches!(err, DownloadError::Source(_)));
    }

    #[test]
    fn test_failed_generation_aborts_bundle() {
        let projects = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let project = Project::new("Logo", SVG);
        let sizes: Vec<u32> = crate::core::catalog::icon_sizes(TargetPlatform::Web)
            .iter()
            .map(|s| s.size)
            .collect();

        let assembler = DownloadAssembler::new(
            fake_generator(&sizes),
            projects.path().to_path_buf(),
            vec![Box::new(ZipArchiver)],
        );
        let err = assembler
            .assemble(&project, BundleType::Web, dest.path())
            .unwrap_err();
        assert!(matches!(err, DownloadError::Generation { ref target, .. } if target == "web"));
    }

    #[test]
    fn test_default_archiver_order() {
        let names: Vec<&str> = default_archivers(true, Duration::from_secs(1))
            .iter()
            .map(|a| a.name())
            .collect();
        assert_eq!(names, vec!["builtin", "powershell", "zip", "7z", "python"]);
        assert_eq!(default_archivers(false, Duration::from_secs(1)).len(), 4);
    }
}

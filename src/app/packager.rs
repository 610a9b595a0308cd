// SVG2Icon - app/packager.rs
//
// Best-effort multi-resolution containers (icon.ico, icon.icns, favicon.ico)
// plus the text extras written next to them.
//
// Each container is produced by the first provider in an ordered list that
// succeeds. A provider that is unavailable or fails is logged and skipped;
// nothing here ever fails the surrounding batch.

use crate::core::container::{self, ContainerFormat, ContainerJob, IconLayer};
use crate::core::catalog;
use crate::core::model::TargetPlatform;
use crate::core::raster::Rasterizer;
use crate::platform::tools;
use crate::util::constants;
use crate::util::error::ToolError;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

// =============================================================================
// Providers
// =============================================================================

/// One way of turning PNG layers into a container file.
pub trait ContainerProvider {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this provider can produce `format` on this host at all.
    fn supports(&self, format: ContainerFormat) -> bool;

    /// Produce the container bytes, or `None` when the provider is
    /// unavailable or fails. Never returns empty bytes as success.
    fn try_produce(&self, job: &ContainerJob, layers: &[IconLayer]) -> Option<Vec<u8>>;
}

/// In-process encoder backed by the `ico` and `icns` crates.
pub struct NativeEncoder;

impl ContainerProvider for NativeEncoder {
    fn name(&self) -> &'static str {
        "native"
    }

    fn supports(&self, _format: ContainerFormat) -> bool {
        true
    }

    fn try_produce(&self, job: &ContainerJob, layers: &[IconLayer]) -> Option<Vec<u8>> {
        match container::encode(job.format, layers) {
            Ok(bytes) if !bytes.is_empty() => Some(bytes),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(file = job.file_name, error = %e, "Native encoder failed");
                None
            }
        }
    }
}

/// ImageMagick (`magick`, or the legacy `convert`). ICO only.
pub struct ImageMagick {
    timeout: Duration,
}

impl ImageMagick {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn produce(&self, job: &ContainerJob, layers: &[IconLayer]) -> Result<Vec<u8>, ToolError> {
        let (tool, exe) =
            tools::find_tool(&["magick", "convert"]).ok_or(ToolError::NotFound { tool: "magick" })?;
        let scratch = Scratch::new(tool)?;
        let inputs = scratch.write_layers(layers, |l| format!("icon-{}.png", l.size))?;
        let output = scratch.path(job.file_name);

        let mut cmd = Command::new(exe);
        cmd.args(&inputs).arg(&output);
        tools::run_with_timeout(&mut cmd, tool, self.timeout)?;
        read_output(tool, &output)
    }
}

impl ContainerProvider for ImageMagick {
    fn name(&self) -> &'static str {
        "imagemagick"
    }

    fn supports(&self, format: ContainerFormat) -> bool {
        format == ContainerFormat::Ico
    }

    fn try_produce(&self, job: &ContainerJob, layers: &[IconLayer]) -> Option<Vec<u8>> {
        log_outcome(self.name(), job, self.produce(job, layers))
    }
}

/// Apple `iconutil` converting an `.iconset` directory. macOS only.
pub struct IconUtil {
    timeout: Duration,
}

impl IconUtil {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn produce(&self, job: &ContainerJob, layers: &[IconLayer]) -> Result<Vec<u8>, ToolError> {
        let (tool, exe) =
            tools::find_tool(&["iconutil"]).ok_or(ToolError::NotFound { tool: "iconutil" })?;
        let scratch = Scratch::new(tool)?;
        let iconset = scratch.path("icon.iconset");
        std::fs::create_dir_all(&iconset).map_err(|e| ToolError::Io {
            path: iconset.clone(),
            source: e,
        })?;

        for (member, size) in constants::ICONSET_MEMBERS {
            let Some(layer) = layers.iter().find(|l| l.size == *size) else {
                continue;
            };
            let path = iconset.join(member);
            std::fs::write(&path, &layer.png).map_err(|e| ToolError::Io { path, source: e })?;
        }

        let output = scratch.path(job.file_name);
        let mut cmd = Command::new(exe);
        cmd.arg("-c").arg("icns").arg(&iconset).arg("-o").arg(&output);
        tools::run_with_timeout(&mut cmd, tool, self.timeout)?;
        read_output(tool, &output)
    }
}

impl ContainerProvider for IconUtil {
    fn name(&self) -> &'static str {
        "iconutil"
    }

    fn supports(&self, format: ContainerFormat) -> bool {
        format == ContainerFormat::Icns && cfg!(target_os = "macos")
    }

    fn try_produce(&self, job: &ContainerJob, layers: &[IconLayer]) -> Option<Vec<u8>> {
        log_outcome(self.name(), job, self.produce(job, layers))
    }
}

/// `png2icns` from libicns. ICNS only.
pub struct Png2Icns {
    timeout: Duration,
}

impl Png2Icns {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn produce(&self, job: &ContainerJob, layers: &[IconLayer]) -> Result<Vec<u8>, ToolError> {
        let (tool, exe) =
            tools::find_tool(&["png2icns"]).ok_or(ToolError::NotFound { tool: "png2icns" })?;
        let scratch = Scratch::new(tool)?;
        let inputs = scratch.write_layers(layers, |l| format!("icon-{}.png", l.size))?;
        let output = scratch.path(job.file_name);

        let mut cmd = Command::new(exe);
        cmd.arg(&output).args(&inputs);
        tools::run_with_timeout(&mut cmd, tool, self.timeout)?;
        read_output(tool, &output)
    }
}

impl ContainerProvider for Png2Icns {
    fn name(&self) -> &'static str {
        "png2icns"
    }

    fn supports(&self, format: ContainerFormat) -> bool {
        format == ContainerFormat::Icns
    }

    fn try_produce(&self, job: &ContainerJob, layers: &[IconLayer]) -> Option<Vec<u8>> {
        log_outcome(self.name(), job, self.produce(job, layers))
    }
}

/// Temporary working directory for one CLI invocation, removed on drop.
struct Scratch {
    dir: tempfile::TempDir,
}

impl Scratch {
    fn new(tool: &str) -> Result<Self, ToolError> {
        let dir = tempfile::Builder::new()
            .prefix("svg2icon-")
            .tempdir()
            .map_err(|e| ToolError::Io {
                path: std::env::temp_dir(),
                source: e,
            })?;
        tracing::trace!(tool, dir = %dir.path().display(), "Scratch directory created");
        Ok(Self { dir })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write_layers(
        &self,
        layers: &[IconLayer],
        name_for: impl Fn(&IconLayer) -> String,
    ) -> Result<Vec<PathBuf>, ToolError> {
        layers
            .iter()
            .map(|layer| {
                let path = self.path(&name_for(layer));
                std::fs::write(&path, &layer.png).map_err(|e| ToolError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                Ok(path)
            })
            .collect()
    }
}

fn read_output(tool: &str, path: &Path) -> Result<Vec<u8>, ToolError> {
    match std::fs::read(path) {
        Ok(bytes) if !bytes.is_empty() => Ok(bytes),
        _ => Err(ToolError::NoOutput {
            tool: tool.to_string(),
            path: path.to_path_buf(),
        }),
    }
}

fn log_outcome(
    provider: &str,
    job: &ContainerJob,
    outcome: Result<Vec<u8>, ToolError>,
) -> Option<Vec<u8>> {
    match outcome {
        Ok(bytes) => Some(bytes),
        Err(ToolError::NotFound { tool }) => {
            tracing::debug!(provider, tool, file = job.file_name, "Converter not installed");
            None
        }
        Err(e) => {
            tracing::warn!(provider, file = job.file_name, error = %e, "Converter failed");
            None
        }
    }
}

// =============================================================================
// Packager
// =============================================================================

/// What a packaging pass left behind in the output directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackagingReport {
    /// File names written.
    pub written: Vec<String>,

    /// Containers no provider could produce.
    pub missing: Vec<String>,
}

impl PackagingReport {
    pub fn has(&self, file_name: &str) -> bool {
        self.written.iter().any(|f| f == file_name)
    }
}

/// Ordered provider cascade plus the desktop and web packaging passes.
pub struct Packager {
    providers: Vec<Box<dyn ContainerProvider>>,
}

impl Packager {
    pub fn new(providers: Vec<Box<dyn ContainerProvider>>) -> Self {
        Self { providers }
    }

    /// Native encoder first, then the external converters.
    pub fn with_default_providers(timeout: Duration) -> Self {
        let packager = Self::new(vec![
            Box::new(NativeEncoder),
            Box::new(ImageMagick::new(timeout)),
            Box::new(IconUtil::new(timeout)),
            Box::new(Png2Icns::new(timeout)),
        ]);
        tracing::debug!(
            providers = ?packager.provider_names(),
            timeout_secs = timeout.as_secs(),
            "Container provider cascade"
        );
        packager
    }

    /// Names of the configured providers, in cascade order.
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Run the cascade for `job`: the first provider returning bytes wins.
    pub fn produce(&self, job: &ContainerJob, layers: &[IconLayer]) -> Option<(&'static str, Vec<u8>)> {
        if layers.is_empty() {
            return None;
        }
        self.providers
            .iter()
            .filter(|p| p.supports(job.format))
            .find_map(|p| {
                p.try_produce(job, layers)
                    .filter(|bytes| !bytes.is_empty())
                    .map(|bytes| (p.name(), bytes))
            })
    }

    /// `icon.ico`, `icon.icns` and `README.md` for desktop-style targets.
    pub fn package_desktop_formats(
        &self,
        rasterizer: &dyn Rasterizer,
        svg: &[u8],
        out_dir: &Path,
        target: TargetPlatform,
    ) -> PackagingReport {
        let mut report = PackagingReport::default();

        for job in [container::ICO_JOB, container::ICNS_JOB] {
            let layers = render_layers(rasterizer, svg, job.sizes);
            self.produce_into(&job, &layers, out_dir, &mut report);
        }

        let readme = desktop_readme(
            target,
            report.has(constants::ICO_FILE_NAME),
            report.has(constants::ICNS_FILE_NAME),
        );
        write_extra(out_dir, constants::README_FILE_NAME, readme.as_bytes(), &mut report);

        tracing::info!(
            platform = %target,
            written = ?report.written,
            missing = ?report.missing,
            "Desktop containers packaged"
        );
        report
    }

    /// `favicon.ico` and `icons-head.html` for the web target.
    pub fn package_web_extras(
        &self,
        rasterizer: &dyn Rasterizer,
        svg: &[u8],
        out_dir: &Path,
    ) -> PackagingReport {
        let mut report = PackagingReport::default();

        let job = container::FAVICON_JOB;
        let layers = render_layers(rasterizer, svg, job.sizes);
        self.produce_into(&job, &layers, out_dir, &mut report);

        let html = head_html(report.has(constants::FAVICON_FILE_NAME));
        write_extra(out_dir, constants::HEAD_HTML_FILE_NAME, html.as_bytes(), &mut report);

        tracing::info!(
            written = ?report.written,
            missing = ?report.missing,
            "Web extras packaged"
        );
        report
    }

    fn produce_into(
        &self,
        job: &ContainerJob,
        layers: &[IconLayer],
        out_dir: &Path,
        report: &mut PackagingReport,
    ) {
        match self.produce(job, layers) {
            Some((provider, bytes)) => {
                tracing::debug!(
                    provider,
                    format = job.format.tag(),
                    file = job.file_name,
                    bytes = bytes.len(),
                    "Container produced"
                );
                write_extra(out_dir, job.file_name, &bytes, report);
            }
            None => {
                tracing::warn!(
                    format = job.format.tag(),
                    file = job.file_name,
                    "No converter could produce this file; skipping"
                );
                report.missing.push(job.file_name.to_string());
            }
        }
    }
}

/// Render one layer per size. Sizes that fail are logged and left out.
fn render_layers(rasterizer: &dyn Rasterizer, svg: &[u8], sizes: &[u32]) -> Vec<IconLayer> {
    sizes
        .iter()
        .filter_map(|&size| match rasterizer.rasterize(svg, size) {
            Ok(png) => Some(IconLayer { size, png }),
            Err(e) => {
                tracing::warn!(size, error = %e, "Container layer failed to render");
                None
            }
        })
        .collect()
}

fn write_extra(out_dir: &Path, file_name: &str, bytes: &[u8], report: &mut PackagingReport) {
    let path = out_dir.join(file_name);
    match std::fs::write(&path, bytes) {
        Ok(()) => report.written.push(file_name.to_string()),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not write packaged file");
            report.missing.push(file_name.to_string());
        }
    }
}

/// `<head>` snippet referencing the web icon set.
pub fn head_html(include_favicon: bool) -> String {
    let mut lines = vec![format!(
        "<!-- {} icons: paste into your site's <head> -->",
        constants::APP_NAME
    )];
    if include_favicon {
        lines.push(format!(
            r#"<link rel="icon" type="image/x-icon" href="/{}">"#,
            constants::FAVICON_FILE_NAME
        ));
    }
    for spec in catalog::icon_sizes(TargetPlatform::Web) {
        let rel = if spec.name.starts_with("apple-touch-icon") {
            r#"apple-touch-icon""#.to_string()
        } else {
            r#"icon" type="image/png""#.to_string()
        };
        lines.push(format!(
            r#"<link rel="{rel} sizes="{0}x{0}" href="/{1}">"#,
            spec.size,
            spec.file_name()
        ));
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Setup notes for desktop/electron output, with manual conversion steps
/// for whichever container is missing.
pub fn desktop_readme(target: TargetPlatform, ico_ok: bool, icns_ok: bool) -> String {
    let status = |ok: bool| if ok { "generated" } else { "not generated, see below" };
    let mut out = format!(
        "# {} App Icons\n\n\
         ## Files\n\n\
         - `icon.ico`: Windows icon ({})\n\
         - `icon.icns`: macOS icon ({})\n\
         - `icon-512.png`: Linux icon\n\
         - `icon-16.png` .. `icon-1024.png`: individual sizes\n\n\
         ## electron-builder\n\n\
         Copy the files into your project and reference them from `package.json`:\n\n\
         ```json\n\
         {{\n  \"build\": {{\n    \"mac\": {{ \"icon\": \"icon.icns\" }},\n    \
         \"win\": {{ \"icon\": \"icon.ico\" }},\n    \"linux\": {{ \"icon\": \"icon-512.png\" }}\n  }}\n}}\n\
         ```\n",
        target.display_name(),
        status(ico_ok),
        status(icns_ok),
    );

    if !ico_ok {
        let inputs: Vec<String> = constants::ICO_SIZES
            .iter()
            .map(|s| format!("icon-{s}.png"))
            .collect();
        out.push_str(&format!(
            "\n## Manual ICO conversion\n\n\
             Install ImageMagick, then run:\n\n\
             ```bash\nmagick {} icon.ico\n```\n",
            inputs.join(" ")
        ));
    }

    if !icns_ok {
        out.push_str("\n## Manual ICNS conversion (macOS)\n\n```bash\nmkdir icon.iconset\n");
        for (member, size) in constants::ICONSET_MEMBERS {
            out.push_str(&format!("cp icon-{size}.png icon.iconset/{member}\n"));
        }
        out.push_str("iconutil -c icns icon.iconset -o icon.icns\nrm -rf icon.iconset\n```\n");
    }

    out
}

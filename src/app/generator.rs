// SVG2Icon - app/generator.rs
//
// Batch generation: one SVG, one target platform, one output directory.
//
// Runs strictly sequentially. A size that fails to render is recorded and
// the batch moves on; only failures of the call itself (unusable source,
// output directory that cannot be created) end it early.

use crate::app::packager::Packager;
use crate::core::catalog;
use crate::core::manifest;
use crate::core::model::{GenerationResult, SourceSvg, TargetPlatform};
use crate::core::raster::{Rasterizer, ResvgRasterizer};
use crate::platform::config::AppConfig;
use crate::platform::fs;
use crate::util::error::GenerationError;
use std::path::Path;

/// Renders a target's size list and packages its extras.
pub struct Generator {
    rasterizer: Box<dyn Rasterizer>,
    packager: Packager,
}

impl Generator {
    pub fn new(rasterizer: Box<dyn Rasterizer>, packager: Packager) -> Self {
        Self {
            rasterizer,
            packager,
        }
    }

    /// resvg rasterizer and the default converter cascade, as configured.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Box::new(ResvgRasterizer::new(config.load_system_fonts)),
            Packager::with_default_providers(config.tool_timeout),
        )
    }

    /// Resolve `source` and generate. A source that cannot be loaded or
    /// decoded yields a failed result.
    pub fn generate_source(
        &self,
        source: &SourceSvg,
        output_base: &Path,
        target: TargetPlatform,
    ) -> GenerationResult {
        match source.load() {
            Ok(svg) => self.generate(&svg, output_base, target),
            Err(e) => {
                tracing::error!(target_platform = %target, error = %e, "Cannot load SVG source");
                GenerationResult::failure(e.to_string())
            }
        }
    }

    /// Generate every icon of `target` into `<output_base>/<target>-icons/`.
    pub fn generate(&self, svg: &[u8], output_base: &Path, target: TargetPlatform) -> GenerationResult {
        let out_dir = output_base.join(target.output_dir_name());
        if let Err(e) = std::fs::create_dir_all(&out_dir) {
            let err = GenerationError::Io {
                path: out_dir.clone(),
                operation: "create output directory",
                source: e,
            };
            tracing::error!(error = %err, "Generation aborted");
            return GenerationResult::failure(err.to_string());
        }

        let specs = catalog::icon_sizes(target);
        let mut errors: Vec<String> = Vec::new();
        let mut files_generated = 0usize;

        tracing::info!(
            target_platform = %target,
            sizes = specs.len(),
            out = %out_dir.display(),
            "Generating icons"
        );

        for spec in specs {
            let png = match self.rasterizer.rasterize(svg, spec.size) {
                Ok(png) => png,
                Err(e) => {
                    tracing::warn!(name = spec.name, size = spec.size, error = %e, "Icon failed");
                    errors.push(format!("Failed to generate {}: {e}", spec.name));
                    continue;
                }
            };

            let path = spec.output_path(&out_dir);
            match fs::write_creating_dirs(&path, &png) {
                Ok(()) => {
                    files_generated += 1;
                    tracing::debug!(name = spec.name, size = spec.size, "Icon written");
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Icon could not be written");
                    errors.push(format!("Failed to write {}: {e}", spec.file_name()));
                }
            }
        }

        if target.wants_desktop_containers() {
            self.packager
                .package_desktop_formats(self.rasterizer.as_ref(), svg, &out_dir, target);
        }
        if target.wants_web_extras() {
            self.packager
                .package_web_extras(self.rasterizer.as_ref(), svg, &out_dir);
        }

        if let Err(e) = manifest::write_manifest(&out_dir, target, specs, svg) {
            tracing::error!(error = %e, "Manifest could not be written");
            errors.push(e.to_string());
        }

        let success = files_generated > 0 || specs.is_empty();
        let message = if success {
            format!("Successfully generated {files_generated} icons")
        } else {
            format!("Failed to generate any {} icons", target.display_name())
        };

        tracing::info!(
            target_platform = %target,
            files = files_generated,
            failures = errors.len(),
            success,
            "Generation finished"
        );

        GenerationResult {
            success,
            message,
            output_path: Some(out_dir),
            files_generated,
            errors: if errors.is_empty() { None } else { Some(errors) },
        }
    }
}

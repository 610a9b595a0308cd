// SVG2Icon - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Dispatch to generate / download / targets / check

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use svg2icon::app::download::DownloadAssembler;
use svg2icon::app::generator::Generator;
use svg2icon::core::model::{BundleType, GenerationResult, Project, SourceSvg, TargetPlatform};
use svg2icon::core::{catalog, validate};
use svg2icon::platform::config::{self, AppConfig, PlatformPaths};
use svg2icon::platform::fs;
use svg2icon::util;

/// SVG2Icon - Generate iOS, Android, desktop and web icon sets from one SVG.
#[derive(Parser, Debug)]
#[command(name = "svg2icon", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the icon set of one or more target platforms.
    Generate {
        /// SVG file to render.
        #[arg(required_unless_present = "base64", conflicts_with = "base64")]
        svg: Option<PathBuf>,

        /// Base64-encoded SVG content instead of a file (data: URLs accepted).
        #[arg(long)]
        base64: Option<String>,

        /// Target platform; repeat for several.
        #[arg(short = 't', long = "target", required = true, value_parser = parse_target)]
        targets: Vec<TargetPlatform>,

        /// Output base directory; each target writes `<target>-icons/` inside it.
        #[arg(short = 'o', long = "out", default_value = ".")]
        out: PathBuf,

        /// Print the generation results as JSON.
        #[arg(long)]
        json: bool,

        /// Render even if the SVG fails content validation.
        #[arg(long)]
        force: bool,
    },

    /// Build a zip bundle for an SVG project.
    Download {
        /// SVG file of the project.
        svg: PathBuf,

        /// all, mobile, desktop, web or original.
        #[arg(short = 'b', long = "bundle", value_parser = parse_bundle)]
        bundle: BundleType,

        /// Project name (defaults to the SVG file stem).
        #[arg(short = 'n', long = "name")]
        name: Option<String>,

        /// Folder to write the zip to (overrides [download] destination).
        #[arg(long = "dest")]
        dest: Option<PathBuf>,

        /// Show the zip in the system file manager afterwards.
        #[arg(long)]
        reveal: bool,

        /// Render even if the SVG fails content validation.
        #[arg(long)]
        force: bool,
    },

    /// List target platforms, or the size list of one target.
    Targets {
        #[arg(short = 't', long = "target", value_parser = parse_target)]
        target: Option<TargetPlatform>,
    },

    /// Validate an SVG file without rendering it.
    Check {
        svg: PathBuf,
    },
}

fn parse_target(s: &str) -> Result<TargetPlatform, String> {
    s.parse().map_err(|e: util::error::GenerationError| e.to_string())
}

fn parse_bundle(s: &str) -> Result<BundleType, String> {
    s.parse().map_err(|e: util::error::DownloadError| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let platform_paths = PlatformPaths::resolve();
    let (app_config, config_warnings) = config::load_config(&platform_paths.config_dir);

    util::logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "SVG2Icon starting"
    );

    let ok = match cli.command {
        Command::Generate {
            svg,
            base64,
            targets,
            out,
            json,
            force,
        } => {
            let source = match (svg, base64) {
                (Some(path), None) => SourceSvg::Path(path),
                (None, Some(data)) => SourceSvg::Base64(data),
                _ => {
                    eprintln!("Error: give either an SVG file or --base64");
                    return ExitCode::FAILURE;
                }
            };
            run_generate(&app_config, &source, &targets, &out, json, force)
        }
        Command::Download {
            svg,
            bundle,
            name,
            dest,
            reveal,
            force,
        } => run_download(
            &app_config,
            &platform_paths,
            &svg,
            bundle,
            name,
            dest,
            reveal,
            force,
        ),
        Command::Targets { target } => {
            run_targets(target);
            true
        }
        Command::Check { svg } => run_check(&svg),
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Load the source and run content validation. `None` means stop.
fn load_checked(source: &SourceSvg, force: bool) -> Option<Vec<u8>> {
    let svg = match source.load() {
        Ok(svg) => svg,
        Err(e) => {
            eprintln!("Error: {e}");
            return None;
        }
    };

    let report = validate::validate_svg_bytes(&svg);
    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }
    if !report.is_valid() {
        for error in &report.errors {
            eprintln!("Error: {error}");
        }
        if !force {
            eprintln!("Refusing to render; pass --force to render anyway.");
            return None;
        }
        tracing::warn!("Rendering invalid SVG because --force was given");
    }
    Some(svg)
}

fn run_generate(
    app_config: &AppConfig,
    source: &SourceSvg,
    targets: &[TargetPlatform],
    out: &Path,
    json: bool,
    force: bool,
) -> bool {
    let Some(svg) = load_checked(source, force) else {
        return false;
    };

    let generator = Generator::from_config(app_config);
    let results: Vec<GenerationResult> = targets
        .iter()
        .map(|&target| generator.generate(&svg, out, target))
        .collect();

    if json {
        match serde_json::to_string_pretty(&results) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("Error: cannot serialise results: {e}"),
        }
    } else {
        for (target, result) in targets.iter().zip(&results) {
            let location = result
                .output_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            println!("{:<10} {} {}", target.as_str(), result.message, location);
            for error in result.error_list() {
                println!("           - {error}");
            }
        }
    }

    results.iter().all(|r| r.success)
}

#[allow(clippy::too_many_arguments)]
fn run_download(
    app_config: &AppConfig,
    platform_paths: &PlatformPaths,
    svg_path: &Path,
    bundle: BundleType,
    name: Option<String>,
    dest: Option<PathBuf>,
    reveal: bool,
    force: bool,
) -> bool {
    let Some(svg) = load_checked(&SourceSvg::Path(svg_path.to_path_buf()), force) else {
        return false;
    };

    let name = name.unwrap_or_else(|| {
        svg_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| util::constants::FALLBACK_NAME.to_string())
    });
    let project = Project::new(&name, &svg);
    let dest = dest
        .or_else(|| app_config.download_destination.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let assembler = DownloadAssembler::from_config(app_config, platform_paths.projects_dir.clone());
    match assembler.assemble(&project, bundle, &dest) {
        Ok(zip_path) => {
            println!("{}", zip_path.display());
            if reveal {
                fs::reveal_in_file_manager(&zip_path);
            }
            true
        }
        Err(e) => {
            eprintln!("Error: {e}");
            false
        }
    }
}

fn run_targets(target: Option<TargetPlatform>) {
    match target {
        None => {
            for t in TargetPlatform::all() {
                println!(
                    "{:<10} {:<10} {:>2} sizes  {}",
                    t.as_str(),
                    t.display_name(),
                    catalog::icon_sizes(*t).len(),
                    t.description()
                );
            }
        }
        Some(t) => {
            println!("{}: {}", t.display_name(), t.description());
            for spec in catalog::icon_sizes(t) {
                let size = format!("{0}x{0}", spec.size);
                match spec.scale {
                    Some(scale) => println!("  {:<32} {:>9}  @{scale}x", spec.file_name(), size),
                    None => println!("  {:<32} {:>9}", spec.file_name(), size),
                }
            }
        }
    }
}

fn run_check(svg_path: &Path) -> bool {
    let svg = match SourceSvg::Path(svg_path.to_path_buf()).load() {
        Ok(svg) => svg,
        Err(e) => {
            eprintln!("Error: {e}");
            return false;
        }
    };

    let report = validate::validate_svg_bytes(&svg);
    for error in &report.errors {
        println!("error:   {error}");
    }
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    if report.is_valid() && report.warnings.is_empty() {
        println!("{}: OK", svg_path.display());
    }
    report.is_valid()
}

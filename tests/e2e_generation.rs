// SVG2Icon - tests/e2e_generation.rs
//
// End-to-end tests for the generation and download pipeline.
//
// These tests use the real resvg rasterizer, the real ico/icns encoders,
// the real filesystem and the in-process zip writer. External converter
// tools are left out so results do not depend on what the host has installed.

use std::path::{Path, PathBuf};
use svg2icon::app::download::{DownloadAssembler, ZipArchiver};
use svg2icon::app::generator::Generator;
use svg2icon::app::packager::{NativeEncoder, Packager};
use svg2icon::core::catalog;
use svg2icon::core::manifest;
use svg2icon::core::model::{encode_base64_svg, BundleType, Project, SourceSvg, TargetPlatform};
use svg2icon::core::raster::ResvgRasterizer;
use walkdir::WalkDir;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn logo() -> Vec<u8> {
    std::fs::read(fixture("logo.svg")).expect("logo fixture")
}

/// Real rasterizer, native container encoder only.
fn generator() -> Generator {
    Generator::new(
        Box::new(ResvgRasterizer::default()),
        Packager::new(vec![Box::new(NativeEncoder)]),
    )
}

fn png_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|x| x == "png"))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

// =============================================================================
// Generation E2E
// =============================================================================

/// Web target: 13 PNGs, favicon, head snippet and manifest.
#[test]
fn e2e_web_target_output() {
    let base = tempfile::tempdir().unwrap();
    let result = generator().generate(&logo(), base.path(), TargetPlatform::Web);

    assert!(result.success, "{result:?}");
    assert_eq!(result.files_generated, 13);
    assert!(result.errors.is_none());

    let out = base.path().join("web-icons");
    assert_eq!(result.output_path.as_deref(), Some(out.as_path()));
    assert_eq!(png_files(&out).len(), 13);
    assert!(out.join("favicon.ico").is_file());
    assert!(out.join("icons-head.html").is_file());

    let m = manifest::read_manifest(&out).unwrap();
    assert_eq!(m.icon_type, TargetPlatform::Web);
    assert_eq!(m.icons.len(), 13);
    let extras: Vec<&str> = m.additional_files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(extras, vec!["favicon.ico", "icons-head.html"]);
}

/// Android hdpi launcher icon is a 72x72 PNG with a transparent background.
#[test]
fn e2e_android_hdpi_icon() {
    let base = tempfile::tempdir().unwrap();
    let result = generator().generate(&logo(), base.path(), TargetPlatform::Android);
    assert!(result.success);

    let path = base.path().join("android-icons/mipmap-hdpi/ic_launcher.png");
    let img = image::open(&path).expect("decodable png");
    assert!(img.color().has_alpha());

    let rgba = img.into_rgba8();
    assert_eq!(rgba.dimensions(), (72, 72));
    assert_eq!(rgba.get_pixel(0, 0)[3], 0, "corner should be transparent");
    assert_eq!(rgba.get_pixel(36, 36)[3], 255, "centre should be opaque");
}

/// Every PNG of every target is rendered at exactly its catalog size.
#[test]
fn e2e_every_icon_has_catalog_size() {
    let base = tempfile::tempdir().unwrap();
    let generator = generator();

    for &target in TargetPlatform::all() {
        let result = generator.generate(&logo(), base.path(), target);
        assert!(result.success, "{target}: {result:?}");

        let out = base.path().join(target.output_dir_name());
        for spec in catalog::icon_sizes(target) {
            let img = image::open(spec.output_path(&out)).expect("png");
            assert_eq!(
                (img.width(), img.height()),
                (spec.size, spec.size),
                "{target}/{}",
                spec.name
            );
        }
    }
}

/// Regenerating with the same input rewrites byte-identical PNGs.
#[test]
fn e2e_regeneration_is_deterministic() {
    let base = tempfile::tempdir().unwrap();
    let generator = generator();
    let out = base.path().join("ios-icons");

    generator.generate(&logo(), base.path(), TargetPlatform::Ios);
    let first: Vec<Vec<u8>> = png_files(&out)
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();
    let first_manifest = manifest::read_manifest(&out).unwrap();

    generator.generate(&logo(), base.path(), TargetPlatform::Ios);
    let second: Vec<Vec<u8>> = png_files(&out)
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();
    let second_manifest = manifest::read_manifest(&out).unwrap();

    assert_eq!(first.len(), 15);
    assert_eq!(first, second);
    assert_eq!(first_manifest.icons, second_manifest.icons);
}

/// `original.svg` is byte-identical to the decoded base64 source.
#[test]
fn e2e_original_svg_round_trip() {
    let base = tempfile::tempdir().unwrap();
    let svg = logo();
    let source = SourceSvg::Base64(format!("data:image/svg+xml;base64,{}", encode_base64_svg(&svg)));

    let result = generator().generate_source(&source, base.path(), TargetPlatform::Universal);
    assert!(result.success);
    assert_eq!(result.files_generated, 16);

    let written = std::fs::read(base.path().join("universal-icons/original.svg")).unwrap();
    assert_eq!(written, svg);
}

/// Desktop target gets both containers and a README without manual steps.
#[test]
fn e2e_desktop_containers() {
    let base = tempfile::tempdir().unwrap();
    let result = generator().generate(&logo(), base.path(), TargetPlatform::Desktop);
    assert!(result.success);

    let out = base.path().join("desktop-icons");
    let ico_bytes = std::fs::read(out.join("icon.ico")).unwrap();
    let ico = ico::IconDir::read(std::io::Cursor::new(ico_bytes)).unwrap();
    assert_eq!(ico.entries().len(), 7);

    let icns_bytes = std::fs::read(out.join("icon.icns")).unwrap();
    let icns = icns::IconFamily::read(std::io::Cursor::new(icns_bytes)).unwrap();
    assert!(icns
        .available_icons()
        .contains(&icns::IconType::RGBA32_512x512_2x));

    let readme = std::fs::read_to_string(out.join("README.md")).unwrap();
    assert!(readme.starts_with("# Desktop App Icons"));
    assert!(!readme.contains("Manual"));

    let m = manifest::read_manifest(&out).unwrap();
    let extras: Vec<&str> = m.additional_files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(extras, vec!["icon.ico", "icon.icns", "README.md"]);
}

/// Unparseable SVG fails every size and therefore the call.
#[test]
fn e2e_corrupt_svg_fails() {
    let base = tempfile::tempdir().unwrap();
    let svg = std::fs::read(fixture("corrupt.svg")).unwrap();
    let result = generator().generate(&svg, base.path(), TargetPlatform::Ios);

    assert!(!result.success);
    assert_eq!(result.files_generated, 0);
    assert_eq!(result.error_list().len(), 15);
    assert!(result.error_list()[0].starts_with("Failed to generate icon-20@1x"));
    assert!(png_files(&base.path().join("ios-icons")).is_empty());
}

/// A valid but extremely tall document fails each size instead of
/// allocating a canvas for it.
#[test]
fn e2e_tall_svg_fails_per_size() {
    let base = tempfile::tempdir().unwrap();
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1 100000" width="1" height="100000">
        <rect width="1" height="100000" fill="#000"/>
    </svg>"##;
    let result = generator().generate(svg, base.path(), TargetPlatform::Web);

    assert!(!result.success);
    assert_eq!(result.files_generated, 0);
    let errors = result.error_list();
    assert_eq!(errors.len(), catalog::icon_sizes(TargetPlatform::Web).len());
    assert!(errors.iter().all(|e| e.contains("Cannot allocate")), "{errors:?}");
    assert!(base.path().join("web-icons/manifest.json").is_file());
    assert!(!base.path().join("web-icons/favicon.ico").exists());
}

// =============================================================================
// Download E2E
// =============================================================================

/// Mobile bundle: one zip with iOS and Android trees under `mobile/`.
#[test]
fn e2e_mobile_bundle() {
    let projects = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let project = Project::new("Check Mark", &logo());
    assert_eq!(project.id, "check_mark");

    let assembler = DownloadAssembler::new(
        generator(),
        projects.path().to_path_buf(),
        vec![Box::new(ZipArchiver)],
    );
    let zip_path = assembler
        .assemble(&project, BundleType::Mobile, dest.path())
        .unwrap();
    assert_eq!(
        zip_path.file_name().unwrap().to_string_lossy(),
        "Check Mark - Mobile - svg2icon.zip"
    );

    let archive = zip::ZipArchive::new(std::fs::File::open(&zip_path).unwrap()).unwrap();
    let names: Vec<&str> = archive.file_names().collect();
    let ios = names
        .iter()
        .filter(|n| n.starts_with("mobile/ios-icons/") && n.ends_with(".png"))
        .count();
    let android = names
        .iter()
        .filter(|n| n.starts_with("mobile/android-icons/") && n.ends_with(".png"))
        .count();
    assert_eq!(ios, 15);
    assert_eq!(android, 7);
    assert!(names.contains(&"mobile/android-icons/mipmap-xxxhdpi/ic_launcher.png"));
}

// SVG2Icon - platform/fs.rs
//
// Filesystem helpers used by the generator and the download assembler.

use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Write `bytes` to `path`, creating any missing parent directories.
pub fn write_creating_dirs(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)
}

/// Recursively copy the contents of `src` into `dest`.
///
/// A missing `src` copies nothing and returns `Ok(0)`. Returns the number of
/// files copied.
pub fn copy_dir_recursive(src: &Path, dest: &Path) -> io::Result<usize> {
    if !src.exists() {
        tracing::debug!(src = %src.display(), "Copy source missing (skipping)");
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry?;
        let relative = match entry.path().strip_prefix(src) {
            Ok(r) => r,
            Err(_) => continue,
        };
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    tracing::debug!(
        src = %src.display(),
        dest = %dest.display(),
        files = copied,
        "Directory copied"
    );
    Ok(copied)
}

/// `base` if it does not exist yet, otherwise the first free
/// `"<stem> (n)<ext>"` sibling, counting from 0.
pub fn unique_path(base: &Path) -> PathBuf {
    if !base.exists() {
        return base.to_path_buf();
    }

    let parent = base.parent().unwrap_or_else(|| Path::new(""));
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = base
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut n: u32 = 0;
    loop {
        let candidate = parent.join(format!("{stem} ({n}){ext}"));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Open the system file manager and highlight `path` within it.
///
/// Platform behaviour:
/// - **Windows**: `explorer.exe /select,"<path>"`
/// - **macOS**: `open -R "<path>"`
/// - **Linux**: `xdg-open "<parent>"` (no standard per-file selection)
///
/// The subprocess is spawned detached; any launch failure is logged at WARN
/// level but never propagated.
pub fn reveal_in_file_manager(path: &Path) {
    #[cfg(target_os = "windows")]
    {
        // `/select,<path>` must be a single argument, no space after the comma.
        let arg = format!("/select,{}", path.display());
        if let Err(e) = std::process::Command::new("explorer").arg(arg).spawn() {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to reveal file in Explorer"
            );
        }
    }
    #[cfg(target_os = "macos")]
    {
        if let Err(e) = std::process::Command::new("open")
            .arg("-R")
            .arg(path)
            .spawn()
        {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to reveal file in Finder"
            );
        }
    }
    #[cfg(target_os = "linux")]
    {
        let parent = path.parent().unwrap_or(path);
        if let Err(e) = std::process::Command::new("xdg-open").arg(parent).spawn() {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to open parent directory in file manager"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("c.txt");
        write_creating_dirs(&path, b"hello").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn test_copy_dir_recursive_keeps_layout() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        write_creating_dirs(&src.path().join("mipmap-hdpi").join("ic.png"), b"png").unwrap();
        write_creating_dirs(&src.path().join("manifest.json"), b"{}").unwrap();

        let out = dest.path().join("copy");
        let copied = copy_dir_recursive(src.path(), &out).unwrap();
        assert_eq!(copied, 2);
        assert!(out.join("mipmap-hdpi").join("ic.png").is_file());
        assert!(out.join("manifest.json").is_file());
    }

    #[test]
    fn test_copy_missing_source_is_noop() {
        let dest = tempfile::tempdir().unwrap();
        let copied = copy_dir_recursive(&dest.path().join("absent"), dest.path()).unwrap();
        assert_eq!(copied, 0);
    }

    #[test]
    fn test_unique_path_counts_from_zero() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("Logo - Web - svg2icon.zip");
        assert_eq!(unique_path(&base), base);

        std::fs::write(&base, b"").unwrap();
        let first = unique_path(&base);
        assert_eq!(first, dir.path().join("Logo - Web - svg2icon (0).zip"));

        std::fs::write(&first, b"").unwrap();
        assert_eq!(
            unique_path(&base),
            dir.path().join("Logo - Web - svg2icon (1).zip")
        );
    }
}

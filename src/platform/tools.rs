// SVG2Icon - platform/tools.rs
//
// Discovery and bounded execution of external command-line converters
// (ImageMagick, iconutil, png2icns, archivers).

use crate::util::constants;
use crate::util::error::ToolError;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// First of `candidates` found on `PATH`, with its resolved location.
pub fn find_tool(candidates: &[&'static str]) -> Option<(&'static str, PathBuf)> {
    candidates.iter().find_map(|name| {
        which::which(name).ok().map(|path| {
            tracing::debug!(tool = name, path = %path.display(), "Tool found");
            (*name, path)
        })
    })
}

/// Run `cmd` to completion, killing it if it outlives `timeout`.
///
/// stdin/stdout/stderr are discarded. A non-zero exit status, a spawn
/// failure and a timeout are all reported as `ToolError`.
pub fn run_with_timeout(cmd: &mut Command, tool: &str, timeout: Duration) -> Result<(), ToolError> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ToolError::Spawn {
            tool: tool.to_string(),
            source: e,
        })?;

    let started = Instant::now();
    let poll = Duration::from_millis(constants::TOOL_POLL_INTERVAL_MS);

    loop {
        let waited = child.try_wait().map_err(|e| ToolError::Spawn {
            tool: tool.to_string(),
            source: e,
        })?;

        if let Some(status) = waited {
            tracing::debug!(
                tool,
                code = ?status.code(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Tool exited"
            );
            return if status.success() {
                Ok(())
            } else {
                Err(ToolError::Failed {
                    tool: tool.to_string(),
                    code: status.code(),
                })
            };
        }

        if started.elapsed() >= timeout {
            // The process may exit between try_wait and kill; either way it is gone.
            let _ = child.kill();
            let _ = child.wait();
            tracing::warn!(tool, timeout_secs = timeout.as_secs(), "Tool timed out and was killed");
            return Err(ToolError::TimedOut {
                tool: tool.to_string(),
                timeout_secs: timeout.as_secs(),
            });
        }

        std::thread::sleep(poll);
    }
}

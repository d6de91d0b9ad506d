//! External binary lookup and blocking execution.

use crate::error::ToolError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Lines of stderr kept in failure reports.
const STDERR_TAIL: usize = 12;

/// Resolve `name` on `PATH`.
pub fn locate(name: &str) -> Result<PathBuf, ToolError> {
    which::which(name).map_err(|_| ToolError::NotFound(name.to_string()))
}

/// Run `program` to completion, failing on non-zero exit.
pub fn run(program: &Path, args: &[OsString]) -> Result<Output, ToolError> {
    let name = program_name(program);

    tracing::debug!(program = %name, ?args, "running");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => ToolError::NotFound(name.clone()),
            _ => ToolError::Spawn {
                program: name.clone(),
                source,
            },
        })?;

    if !output.status.success() {
        return Err(ToolError::Failed {
            program: name,
            status: output.status,
            stderr: stderr_tail(&output.stderr),
        });
    }

    if !output.stderr.is_empty() {
        tracing::trace!(program = %name, stderr = %String::from_utf8_lossy(&output.stderr));
    }

    Ok(output)
}

fn program_name(program: &Path) -> String {
    program
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_last_stderr_lines() {
        let stderr: String = (0..20).map(|i| format!("line {i}\n\n")).collect();
        let tail = stderr_tail(stderr.as_bytes());

        assert_eq!(tail.lines().count(), STDERR_TAIL);
        assert!(tail.starts_with("line 8"));
        assert!(tail.ends_with("line 19"));
    }

    #[test]
    fn missing_binary_is_not_found() {
        let err = run(Path::new("yth-no-such-binary"), &[]).unwrap_err();
        assert!(matches!(err, ToolError::NotFound(name) if name == "yth-no-such-binary"));
    }

    #[test]
    fn locate_unknown_binary_fails() {
        assert!(matches!(
            locate("yth-no-such-binary"),
            Err(ToolError::NotFound(_))
        ));
    }
}

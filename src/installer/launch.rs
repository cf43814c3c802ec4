//! Starting bundle executables as detached processes

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, info, warn};

use crate::error::{Result, install};

/// A started process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchedProcess {
    pub pid: u32,
    pub executable: PathBuf,
}

/// Start `executable` with `args` without waiting for it.
///
/// The executable is made executable first if needed. The process runs in the
/// executable's directory, in its own process group, with no standard streams attached.
/// A background thread waits for it so it never lingers as a zombie.
pub fn spawn_detached(executable: &Path, args: &[String]) -> Result<LaunchedProcess> {
    let fail = |reason: String| install::launch_failed(executable.display().to_string(), reason);

    if !executable.is_file() {
        return Err(fail("executable not found".to_string()));
    }
    ensure_executable(executable)
        .map_err(|e| fail(format!("failed to make binary executable: {e}")))?;

    let mut command = Command::new(executable);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    if let Some(dir) = executable.parent() {
        command.current_dir(dir);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let mut child = command.spawn().map_err(|e| fail(e.to_string()))?;
    let pid = child.id();
    info!(pid, executable = %executable.display(), "launched");

    let reaper = thread::Builder::new()
        .name(format!("reap-{pid}"))
        .spawn(move || match child.wait() {
            Ok(status) => debug!(pid, %status, "launched process exited"),
            Err(e) => warn!(pid, error = %e, "could not wait for launched process"),
        });
    if let Err(e) = reaper {
        warn!(pid, error = %e, "could not start reaper thread");
    }

    Ok(LaunchedProcess {
        pid,
        executable: executable.to_path_buf(),
    })
}

/// Add execute permission (mode 0755) when the owner cannot execute the file
#[cfg(unix)]
pub fn ensure_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = fs::metadata(path)?.permissions().mode();
    if mode & 0o100 == 0 {
        fs::set_permissions(path, fs::Permissions::from_mode(mode | 0o755))?;
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn ensure_executable(path: &Path) -> std::io::Result<()> {
    fs::metadata(path).map(|_| ())
}

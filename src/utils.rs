use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

use crate::global_constants::INSTANCE_LOCK_FILE_NAME;

/// Only one controller may own the port and the displays. A previous instance
/// still running is killed so its browsers release the screens. A pid that now
/// belongs to some other program is left alone.
pub fn ensure_single_instance() -> bool {
    let lock_file_path = std::env::temp_dir().join(INSTANCE_LOCK_FILE_NAME);
    ensure_single_instance_with_lock(&lock_file_path)
}

fn ensure_single_instance_with_lock(lock_file_path: &Path) -> bool {
    if lock_file_path.exists() {
        if let Ok(pid_string) = fs::read_to_string(lock_file_path) {
            if let Ok(pid) = pid_string.trim().parse::<u32>() {
                stop_previous_instance(pid);
            }
        }
        let _ = fs::remove_file(lock_file_path);
    }

    let current_pid = std::process::id();
    if let Err(e) = fs::File::create(lock_file_path)
        .and_then(|mut file| file.write_all(current_pid.to_string().as_bytes()))
    {
        log::error!("[INSTANCE] Failed to create lock file: {}", e);
        return false;
    }

    log::info!("[INSTANCE] Created lock file with PID: {}", current_pid);
    true
}

fn stop_previous_instance(pid: u32) {
    if pid == std::process::id() {
        return;
    }

    log::info!("[INSTANCE] Found existing instance with PID: {}", pid);

    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing().with_exe(UpdateKind::OnlyIfNotSet),
    );

    match system.process(Pid::from_u32(pid)) {
        Some(process) if is_same_program(process) => {
            log::warn!("[INSTANCE] Killing existing instance (PID: {})", pid);
            process.kill();
            std::thread::sleep(std::time::Duration::from_millis(500));
        }
        Some(process) => {
            log::warn!(
                "[INSTANCE] PID {} now belongs to {:?}, leaving it running",
                pid,
                process.name()
            );
        }
        None => {
            log::info!(
                "[INSTANCE] Previous instance (PID: {}) is not running, cleaning up stale lock file",
                pid
            );
        }
    }
}

fn is_same_program(process: &Process) -> bool {
    let Ok(current_executable) = std::env::current_exe() else {
        return false;
    };

    match process.exe() {
        Some(executable) => canonical(executable) == canonical(&current_executable),
        None => current_executable
            .file_name()
            .is_some_and(|file_name| file_name == process.name()),
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

// mpv-backed playback sessions
// One child process per track; pause/resume are process signals on unix,
// volume goes over mpv's JSON IPC channel when it is reachable.

use super::session::{PlaybackSession, Player, SessionControl, SessionOutcome};
use crate::config::PlayerConfig;
use crate::error::{StreamError, StreamResult};
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

const MAX_VOLUME: u32 = 100;

pub struct MpvPlayer {
    config: PlayerConfig,
    ipc_dir: PathBuf,
    // Survives between tracks so a volume change sticks for the next one
    volume: Arc<AtomicU32>,
    sessions_started: AtomicU64,
}

impl MpvPlayer {
    pub fn new(config: PlayerConfig) -> Self {
        let volume = Arc::new(AtomicU32::new(config.initial_volume.min(MAX_VOLUME)));
        Self {
            config,
            ipc_dir: std::env::temp_dir(),
            volume,
            sessions_started: AtomicU64::new(0),
        }
    }

    /// Quick presence check used at startup
    pub fn is_available(binary: &str) -> bool {
        std::process::Command::new(binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    #[cfg(unix)]
    fn ipc_path(&self, session_number: u64) -> PathBuf {
        self.ipc_dir.join(format!(
            "streamtune-{}-{}.sock",
            std::process::id(),
            session_number
        ))
    }

    #[cfg(not(unix))]
    fn ipc_path(&self, session_number: u64) -> PathBuf {
        let _ = &self.ipc_dir;
        PathBuf::from(format!(
            r"\\.\pipe\streamtune-{}-{}",
            std::process::id(),
            session_number
        ))
    }
}

impl Player for MpvPlayer {
    type Session = MpvSession;

    fn start(&self, stream_url: &str) -> StreamResult<MpvSession> {
        let session_number = self.sessions_started.fetch_add(1, Ordering::Relaxed);
        let ipc_path = self.ipc_path(session_number);
        let volume = self.volume.load(Ordering::SeqCst);

        let child = Command::new(&self.config.binary)
            .arg("--no-video")
            .arg("--quiet")
            .arg("--no-terminal")
            .arg(format!("--input-ipc-server={}", ipc_path.display()))
            .arg(format!("--volume={}", volume))
            .args(&self.config.extra_args)
            .arg(stream_url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(StreamError::Spawn)?;

        let pid = child.id();
        info!(
            "Started {} (pid {:?}) for {}",
            self.config.binary, pid, stream_url
        );

        Ok(MpvSession {
            child,
            control: Arc::new(MpvControl {
                pid: Mutex::new(pid),
                ipc_path,
                volume: self.volume.clone(),
                terminate_requested: AtomicBool::new(false),
                shutdown: Notify::new(),
            }),
            grace: Duration::from_millis(self.config.terminate_grace_ms),
        })
    }
}

struct MpvControl {
    // None once the child has been reaped
    pid: Mutex<Option<u32>>,
    ipc_path: PathBuf,
    volume: Arc<AtomicU32>,
    terminate_requested: AtomicBool,
    shutdown: Notify,
}

impl MpvControl {
    fn send_command(&self, command: serde_json::Value) -> std::io::Result<()> {
        let mut line = command.to_string();
        line.push('\n');
        write_ipc(&self.ipc_path, line.as_bytes())
    }

    fn pid(&self) -> Option<u32> {
        *self.pid.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Called once the child is reaped; signals are refused from here on
    fn mark_exited(&self) {
        self.pid.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    #[cfg(unix)]
    fn signal(&self, signal: libc::c_int) -> StreamResult<()> {
        // Held across kill(2) so mark_exited can't slip in between
        let guard = self.pid.lock().unwrap_or_else(PoisonError::into_inner);
        let pid = (*guard).ok_or_else(|| {
            StreamError::Control(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "audio process has already exited",
            ))
        })?;

        // SAFETY: kill(2) takes no pointers. The pid is cleared under this lock
        // right after the child is reaped.
        let rc = unsafe { libc::kill(pid as libc::pid_t, signal) };
        drop(guard);
        if rc == 0 {
            Ok(())
        } else {
            Err(StreamError::Control(std::io::Error::last_os_error()))
        }
    }

    fn remove_ipc_socket(&self) {
        #[cfg(unix)]
        {
            let _ = std::fs::remove_file(&self.ipc_path);
        }
    }
}

#[cfg(unix)]
fn write_ipc(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut stream = std::os::unix::net::UnixStream::connect(path)?;
    stream.write_all(bytes)
}

#[cfg(not(unix))]
fn write_ipc(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut pipe = std::fs::OpenOptions::new().write(true).open(path)?;
    pipe.write_all(bytes)
}

impl SessionControl for MpvControl {
    #[cfg(unix)]
    fn pause(&self) -> StreamResult<()> {
        self.signal(libc::SIGSTOP)
    }

    #[cfg(unix)]
    fn resume(&self) -> StreamResult<()> {
        self.signal(libc::SIGCONT)
    }

    // No job-control signals here, so ask mpv itself to hold playback
    #[cfg(not(unix))]
    fn pause(&self) -> StreamResult<()> {
        self.send_command(json!({ "command": ["set_property", "pause", true] }))
            .map_err(StreamError::Control)
    }

    #[cfg(not(unix))]
    fn resume(&self) -> StreamResult<()> {
        self.send_command(json!({ "command": ["set_property", "pause", false] }))
            .map_err(StreamError::Control)
    }

    fn adjust_volume(&self, delta: i32) -> Option<u32> {
        let current = self.volume.load(Ordering::SeqCst) as i32;
        let target = (current + delta).clamp(0, MAX_VOLUME as i32) as u32;

        match self.send_command(json!({ "command": ["set_property", "volume", target] })) {
            Ok(()) => {
                self.volume.store(target, Ordering::SeqCst);
                debug!("Volume set to {}", target);
                Some(target)
            }
            Err(e) => {
                debug!("Volume control unavailable: {}", e);
                None
            }
        }
    }

    fn volume(&self) -> Option<u32> {
        Some(self.volume.load(Ordering::SeqCst))
    }

    fn terminate(&self) {
        if !self.terminate_requested.swap(true, Ordering::SeqCst) {
            debug!("Termination requested for pid {:?}", self.pid());
            // notify_one keeps a permit if the waiter isn't listening yet
            self.shutdown.notify_one();
        }
    }
}

pub struct MpvSession {
    child: Child,
    control: Arc<MpvControl>,
    grace: Duration,
}

impl MpvSession {
    async fn shut_down(&mut self) {
        #[cfg(unix)]
        {
            // A stopped process never gets to handle SIGTERM
            let _ = self.control.signal(libc::SIGCONT);
            let _ = self.control.signal(libc::SIGTERM);

            match tokio::time::timeout(self.grace, self.child.wait()).await {
                Ok(Ok(status)) => {
                    debug!("Audio process exited after SIGTERM: {}", status);
                    return;
                }
                Ok(Err(e)) => warn!("Waiting on audio process failed: {}", e),
                Err(_) => warn!("Audio process ignored SIGTERM for {:?}, killing", self.grace),
            }
        }

        if let Err(e) = self.child.kill().await {
            warn!("Failed to kill audio process: {}", e);
        }
    }
}

impl PlaybackSession for MpvSession {
    fn control(&self) -> Arc<dyn SessionControl> {
        self.control.clone()
    }

    async fn wait(mut self) -> SessionOutcome {
        let terminated = tokio::select! {
            status = self.child.wait() => {
                match status {
                    Ok(status) => debug!("Audio process ended on its own: {}", status),
                    Err(e) => warn!("Lost track of audio process: {}", e),
                }
                false
            }
            _ = self.control.shutdown.notified() => true,
        };
        if !terminated {
            self.control.mark_exited();
        }

        let outcome = if terminated {
            self.shut_down().await;
            self.control.mark_exited();
            SessionOutcome::Terminated
        } else {
            SessionOutcome::NaturalEnd
        };

        self.control.remove_ipc_socket();
        outcome
    }
}

//! Collaborators the study core calls out to: notifications and speech.

use std::env;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;

use crate::error::{StudyError, StudyResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

/// Fire-and-forget user notifications.
pub trait Notifier {
    fn notify(&mut self, message: &str, severity: Severity);
}

impl Notifier for mpsc::Sender<Notice> {
    fn notify(&mut self, message: &str, severity: Severity) {
        // Receiver gone means nobody is displaying notices anymore.
        let _ = self.send(Notice {
            message: message.to_string(),
            severity,
        });
    }
}

/// Discards every notice.
pub struct Silent;

impl Notifier for Silent {
    fn notify(&mut self, _message: &str, _severity: Severity) {}
}

/// Best-effort text to speech.
pub trait Speaker {
    fn speak(&mut self, text: &str) -> StudyResult<()>;
}

const SPEECH_PROGRAMS: &[&str] = &["espeak-ng", "espeak", "say"];

/// Speaks through an external program, either configured (with optional
/// arguments, split on whitespace) or the first known one found on `PATH`.
pub struct CommandSpeaker {
    command: Option<Vec<String>>,
}

impl CommandSpeaker {
    pub fn new(configured: Option<&str>) -> Self {
        let command = configured
            .map(|c| c.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|parts| !parts.is_empty())
            .or_else(|| discover().map(|program| vec![program]));
        Self { command }
    }

    pub fn is_available(&self) -> bool {
        self.command.is_some()
    }
}

fn discover() -> Option<String> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path).find_map(|dir| {
        SPEECH_PROGRAMS
            .iter()
            .find(|program| is_file(&dir.join(program)))
            .map(|program| program.to_string())
    })
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}

impl Speaker for CommandSpeaker {
    fn speak(&mut self, text: &str) -> StudyResult<()> {
        let Some((program, args)) = self.command.as_ref().and_then(|c| c.split_first()) else {
            return Err(StudyError::CapabilityUnavailable(
                "speech synthesis".to_string(),
            ));
        };

        let mut child = Command::new(program)
            .args(args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                    StudyError::CapabilityUnavailable(format!("speech program `{program}`"))
                }
                _ => StudyError::Io(e),
            })?;

        // Reap in the background so playback never blocks the caller.
        thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

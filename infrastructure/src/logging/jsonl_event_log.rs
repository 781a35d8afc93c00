//! JSONL audit trail for session events.
//!
//! Each [`SessionEvent`] is serialized as a single JSON line carrying its
//! `type` tag plus a `timestamp`, appended to the file via a buffered writer.

use casino_application::ports::event_publisher::{SessionEvent, SessionEventPublisher};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Event log that appends one JSON object per published event.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlEventLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventLog {
    /// Open the log at `path` for appending.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create event log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open event log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionEventPublisher for JsonlEventLog {
    fn publish(&self, event: SessionEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut record = match serde_json::to_value(&event) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(_) | Err(_) => return,
        };
        record.insert(
            "timestamp".to_string(),
            serde_json::Value::String(timestamp),
        );

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // Flush every line so a crash loses at most the event in flight
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlEventLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casino_domain::{ParticipantId, SessionId, SessionPhase, VoteId, VotingRound};

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_event_log_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.events.jsonl");
        let log = JsonlEventLog::new(&path).unwrap();

        log.publish(SessionEvent::PhaseChanged {
            session_id: SessionId::new("s1"),
            from: SessionPhase::Waiting,
            to: SessionPhase::BettingLayer1,
        });
        log.publish(SessionEvent::VoteSubmitted {
            session_id: SessionId::new("s1"),
            participant_id: ParticipantId::new("p1"),
            round: VotingRound::Layer1,
            vote_id: VoteId::new("v1"),
        });

        drop(log);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert!(line.get("type").is_some());
            assert!(line.get("timestamp").is_some());
        }

        assert_eq!(lines[0]["type"], "phase_changed");
        assert_eq!(lines[0]["session_id"], "s1");
        assert_eq!(lines[0]["to"], "betting_layer1");

        assert_eq!(lines[1]["type"], "vote_submitted");
        assert_eq!(lines[1]["participant_id"], "p1");
        assert_eq!(lines[1]["round"], "layer1");
    }

    #[test]
    fn test_event_log_appends_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.jsonl");

        for id in ["s1", "s2"] {
            let log = JsonlEventLog::new(&path).unwrap();
            log.publish(SessionEvent::ResultsUpdated {
                session_id: SessionId::new(id),
            });
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["session_id"], "s1");
        assert_eq!(lines[1]["session_id"], "s2");
    }

    #[test]
    fn test_event_log_returns_none_for_directory_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlEventLog::new(dir.path()).is_none());
    }
}

//! File loader service
//!
//! Tracks at most one in-flight read per tab. Starting a new read for a tab
//! cancels the previous one, so a superseded file never reaches the
//! workspace.

use crate::error::ReadError;
use crate::model::CommandType;
use crate::services::chunk_reader::{ChunkReader, ReadEvent, ReadHandle};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

/// A read that has not finished yet
struct PendingLoad {
    handle: ReadHandle,
    file_name: String,
    read: u64,
    total: u64,
    started: Instant,
}

/// Result of a finished read, ready to be applied to the workspace
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        command_type: CommandType,
        file_name: String,
        text: String,
    },
    Failed {
        command_type: CommandType,
        file_name: String,
        error: ReadError,
    },
}

pub struct FileLoader {
    pending: HashMap<CommandType, PendingLoad>,
    chunk_size: usize,
}

impl FileLoader {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            pending: HashMap::new(),
            chunk_size,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Start loading `path` into the tab for `command_type`.
    ///
    /// Returns false without doing anything for an empty path or a type that
    /// is not a tab.
    pub fn start(&mut self, command_type: CommandType, path: &Path) -> bool {
        if !command_type.is_tab() || path.as_os_str().is_empty() {
            return false;
        }

        if let Some(previous) = self.pending.remove(&command_type) {
            tracing::info!(
                tab = %command_type,
                path = %previous.handle.path().display(),
                "superseding in-flight read"
            );
            previous.handle.cancel();
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        tracing::info!(tab = %command_type, path = %path.display(), "loading file");

        self.pending.insert(
            command_type,
            PendingLoad {
                handle: ChunkReader::spawn(path, self.chunk_size),
                file_name,
                read: 0,
                total: 0,
                started: Instant::now(),
            },
        );
        true
    }

    /// Cancel the read for a tab, if any
    pub fn cancel(&mut self, command_type: CommandType) -> bool {
        match self.pending.remove(&command_type) {
            Some(load) => {
                load.handle.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_loading(&self, command_type: CommandType) -> bool {
        self.pending.contains_key(&command_type)
    }

    /// `(bytes read, total bytes)` of the in-flight read for a tab
    pub fn progress(&self, command_type: CommandType) -> Option<(u64, u64)> {
        self.pending.get(&command_type).map(|p| (p.read, p.total))
    }

    /// File name of the in-flight read for a tab
    pub fn loading_file_name(&self, command_type: CommandType) -> Option<&str> {
        self.pending.get(&command_type).map(|p| p.file_name.as_str())
    }

    /// Drain pending events without blocking and return finished loads
    pub fn poll(&mut self) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::new();
        let mut finished = Vec::new();

        for (command_type, load) in self.pending.iter_mut() {
            loop {
                let event = match load.handle.try_next() {
                    Some(event) => event,
                    // Drain once more: the final event may land just before exit
                    None if load.handle.is_finished() => load
                        .handle
                        .try_next()
                        .unwrap_or_else(|| load.handle.crashed_event()),
                    None => break,
                };
                match event {
                    ReadEvent::Progress { read, total } => {
                        load.read = read;
                        load.total = total;
                    }
                    ReadEvent::Complete(text) => {
                        tracing::info!(
                            tab = %command_type,
                            file = %load.file_name,
                            bytes = text.len(),
                            elapsed_ms = load.started.elapsed().as_millis() as u64,
                            "file loaded"
                        );
                        outcomes.push(LoadOutcome::Loaded {
                            command_type: *command_type,
                            file_name: load.file_name.clone(),
                            text,
                        });
                        finished.push(*command_type);
                        break;
                    }
                    ReadEvent::Failed(error) => {
                        let message = error.to_string();
                        tracing::error!(tab = %command_type, file = %load.file_name, error = %message, "file load failed");
                        outcomes.push(LoadOutcome::Failed {
                            command_type: *command_type,
                            file_name: load.file_name.clone(),
                            error,
                        });
                        finished.push(*command_type);
                        break;
                    }
                }
            }
        }

        for command_type in finished {
            self.pending.remove(&command_type);
        }

        outcomes
    }

    /// Block until the read for a tab finishes
    pub fn wait(&mut self, command_type: CommandType) -> Option<LoadOutcome> {
        let load = self.pending.remove(&command_type)?;
        let file_name = load.file_name;
        let outcome = match load.handle.wait() {
            Ok(text) => LoadOutcome::Loaded {
                command_type,
                file_name,
                text,
            },
            Err(error) => LoadOutcome::Failed {
                command_type,
                file_name,
                error,
            },
        };
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;

    fn poll_until_done(loader: &mut FileLoader) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::new();
        for _ in 0..500 {
            outcomes.extend(loader.poll());
            if !loader.is_loading(CommandType::Dml) && !loader.is_loading(CommandType::Ddl) {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        outcomes
    }

    #[test]
    fn test_load_through_poll() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.sql");
        fs::write(&path, "--#MainSQL\nSELECT 1;").unwrap();

        let mut loader = FileLoader::new(4);
        assert!(loader.start(CommandType::Dml, &path));
        assert!(loader.is_loading(CommandType::Dml));
        assert_eq!(loader.loading_file_name(CommandType::Dml), Some("orders.sql"));

        let outcomes = poll_until_done(&mut loader);
        assert_eq!(outcomes.len(), 1);
        match &outcomes[0] {
            LoadOutcome::Loaded {
                command_type,
                file_name,
                text,
            } => {
                assert_eq!(*command_type, CommandType::Dml);
                assert_eq!(file_name, "orders.sql");
                assert_eq!(text, "--#MainSQL\nSELECT 1;");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(!loader.is_loading(CommandType::Dml));
    }

    #[test]
    fn test_ignores_none_and_empty_path() {
        let mut loader = FileLoader::new(16);
        assert!(!loader.start(CommandType::None, Path::new("a.sql")));
        assert!(!loader.start(CommandType::Dml, Path::new("")));
        assert!(!loader.is_loading(CommandType::Dml));
        assert!(!loader.is_loading(CommandType::None));
    }

    #[test]
    fn test_new_read_supersedes_previous() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.sql");
        let second = dir.path().join("second.sql");
        fs::write(&first, "x".repeat(1 << 16)).unwrap();
        fs::write(&second, "--#MainSQL\nSELECT 2;").unwrap();

        let mut loader = FileLoader::new(1);
        loader.start(CommandType::Ddl, &first);
        loader.start(CommandType::Ddl, &second);

        let outcomes = poll_until_done(&mut loader);
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(
            &outcomes[0],
            LoadOutcome::Loaded { file_name, .. } if file_name == "second.sql"
        ));
    }

    #[test]
    fn test_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = FileLoader::new(16);
        loader.start(CommandType::Dml, &dir.path().join("missing.sql"));

        let outcome = loader.wait(CommandType::Dml).unwrap();
        assert!(matches!(
            outcome,
            LoadOutcome::Failed {
                error: ReadError::Io { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.sql");
        fs::write(&path, "x".repeat(1 << 16)).unwrap();

        let mut loader = FileLoader::new(1);
        loader.start(CommandType::Dml, &path);
        assert!(loader.cancel(CommandType::Dml));
        assert!(!loader.cancel(CommandType::Dml));
        assert!(loader.poll().is_empty());
    }
}

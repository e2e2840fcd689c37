//! Background chunked file reader
//!
//! Reads a file in fixed-size chunks on its own thread and reports through a
//! channel: a progress event for each chunk that leaves bytes to read, then a
//! single completion carrying the decoded text, or a failure.

use crate::error::ReadError;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Default chunk size in bytes
pub const DEFAULT_CHUNK_SIZE: usize = 65536;

/// Event sent from the reader thread
#[derive(Debug)]
pub enum ReadEvent {
    Progress { read: u64, total: u64 },
    Complete(String),
    Failed(ReadError),
}

/// Handle to an in-flight read
pub struct ReadHandle {
    receiver: Receiver<ReadEvent>,
    cancel: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    path: PathBuf,
}

impl ReadHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ask the reader to stop after the chunk it is reading
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Next event without blocking. `None` when nothing is pending or the
    /// reader has finished.
    pub fn try_next(&self) -> Option<ReadEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the next event, `None` once the reader is gone
    pub fn recv(&self) -> Option<ReadEvent> {
        self.receiver.recv().ok()
    }

    /// Block until the read finishes, returning the text or the failure
    pub fn wait(mut self) -> Result<String, ReadError> {
        let mut outcome = Err(ReadError::Cancelled);
        while let Some(event) = self.recv() {
            match event {
                ReadEvent::Progress { .. } => {}
                ReadEvent::Complete(text) => outcome = Ok(text),
                ReadEvent::Failed(err) => outcome = Err(err),
            }
        }
        let joined = match self.thread.take() {
            Some(thread) => thread.join(),
            None => Ok(()),
        };
        settle(outcome, joined, &self.path)
    }

    /// True once the reader thread has exited
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |thread| thread.is_finished())
    }

    /// A `Failed` event for a reader that exited without a final event
    pub fn crashed_event(&self) -> ReadEvent {
        ReadEvent::Failed(ReadError::Crashed {
            path: self.path.clone(),
        })
    }
}

/// Combine the last reported outcome with the reader thread's exit.
/// A panic without a final event is reported as a crash, not a cancel.
fn settle(
    outcome: Result<String, ReadError>,
    joined: thread::Result<()>,
    path: &Path,
) -> Result<String, ReadError> {
    if joined.is_err() {
        tracing::error!(path = %path.display(), "reader thread panicked");
        if matches!(outcome, Err(ReadError::Cancelled)) {
            return Err(ReadError::Crashed {
                path: path.to_path_buf(),
            });
        }
    }
    outcome
}

impl Drop for ReadHandle {
    fn drop(&mut self) {
        // The thread notices the closed channel or the flag and exits on its own
        self.cancel();
    }
}

/// Spawns chunked reads
pub struct ChunkReader;

impl ChunkReader {
    /// Start reading `path` on a background thread
    pub fn spawn(path: impl Into<PathBuf>, chunk_size: usize) -> ReadHandle {
        let path = path.into();
        let chunk_size = chunk_size.max(1);
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        let thread_path = path.clone();
        let thread_cancel = Arc::clone(&cancel);
        let thread = thread::spawn(move || {
            let event = match Self::read_chunks(&thread_path, chunk_size, &thread_cancel, &tx) {
                Ok(text) => ReadEvent::Complete(text),
                Err(err) => ReadEvent::Failed(err),
            };
            let _ = tx.send(event);
        });

        tracing::debug!(path = %path.display(), chunk_size, "chunked read started");

        ReadHandle {
            receiver: rx,
            cancel,
            thread: Some(thread),
            path,
        }
    }

    fn read_chunks(
        path: &Path,
        chunk_size: usize,
        cancel: &AtomicBool,
        tx: &Sender<ReadEvent>,
    ) -> Result<String, ReadError> {
        let mut file = File::open(path).map_err(|e| ReadError::io(path, e))?;
        // Only a hint: pipes and procfs report 0, and files may grow
        let mut total = file.metadata().map_err(|e| ReadError::io(path, e))?.len();

        let mut bytes = Vec::with_capacity(total as usize);
        let mut chunk = vec![0u8; chunk_size];
        let mut read: u64 = 0;

        loop {
            if cancel.load(Ordering::Relaxed) {
                return Err(ReadError::Cancelled);
            }

            // Fill a whole chunk unless the input ends first
            let mut filled = 0;
            while filled < chunk_size {
                let n = file
                    .read(&mut chunk[filled..])
                    .map_err(|e| ReadError::io(path, e))?;
                if n == 0 {
                    break;
                }
                filled += n;
            }
            if filled == 0 {
                break;
            }

            bytes.extend_from_slice(&chunk[..filled]);
            read += filled as u64;
            total = total.max(read);

            if filled < chunk_size {
                break;
            }
            if read < total && tx.send(ReadEvent::Progress { read, total }).is_err() {
                return Err(ReadError::Cancelled);
            }
        }

        String::from_utf8(bytes).map_err(|e| ReadError::Encoding {
            path: path.to_path_buf(),
            offset: e.utf8_error().valid_up_to(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    fn collect(handle: &ReadHandle) -> Vec<ReadEvent> {
        let mut events = Vec::new();
        while let Some(event) = handle.recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_progress_count_for_partial_last_chunk() {
        let content: String = "abcdefghij".repeat(DEFAULT_CHUNK_SIZE);
        let content = &content[..DEFAULT_CHUNK_SIZE * 3 + 10];
        let file = temp_file(content.as_bytes());

        let handle = ChunkReader::spawn(file.path(), DEFAULT_CHUNK_SIZE);
        let events = collect(&handle);

        let progress: Vec<(u64, u64)> = events
            .iter()
            .filter_map(|e| match e {
                ReadEvent::Progress { read, total } => Some((*read, *total)),
                _ => None,
            })
            .collect();
        let total = content.len() as u64;
        assert_eq!(
            progress,
            vec![
                (DEFAULT_CHUNK_SIZE as u64, total),
                (DEFAULT_CHUNK_SIZE as u64 * 2, total),
                (DEFAULT_CHUNK_SIZE as u64 * 3, total),
            ]
        );

        assert_eq!(events.len(), 4);
        match events.last() {
            Some(ReadEvent::Complete(text)) => assert_eq!(text, content),
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_multiple_of_chunk_size() {
        let file = temp_file(&[b'x'; 12]);
        let handle = ChunkReader::spawn(file.path(), 4);
        let events = collect(&handle);
        let progress = events
            .iter()
            .filter(|e| matches!(e, ReadEvent::Progress { .. }))
            .count();
        assert_eq!(progress, 2);
        assert!(matches!(events.last(), Some(ReadEvent::Complete(t)) if t == "xxxxxxxxxxxx"));
    }

    #[test]
    fn test_empty_file_completes_without_progress() {
        let file = temp_file(b"");
        let handle = ChunkReader::spawn(file.path(), DEFAULT_CHUNK_SIZE);
        let events = collect(&handle);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], ReadEvent::Complete(t) if t.is_empty()));
    }

    #[test]
    fn test_multibyte_text_split_across_chunks() {
        let text = "--#MainSQL\n--請放置異動語法\n";
        let file = temp_file(text.as_bytes());
        // Chunk boundaries fall inside multi-byte characters
        let result = ChunkReader::spawn(file.path(), 3).wait();
        assert_eq!(result.unwrap(), text);
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let file = temp_file(&[b'a', b'b', 0xff, 0xfe]);
        let result = ChunkReader::spawn(file.path(), 2).wait();
        match result {
            Err(ReadError::Encoding { offset, .. }) => assert_eq!(offset, 2),
            other => panic!("expected encoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = ChunkReader::spawn(dir.path().join("missing.sql"), 16).wait();
        assert!(matches!(result, Err(ReadError::Io { .. })));
    }

    #[test]
    fn test_cancel_after_first_chunk() {
        let file = temp_file(&vec![b'x'; 1024 * 1024]);
        let handle = ChunkReader::spawn(file.path(), 1);
        assert!(matches!(handle.recv(), Some(ReadEvent::Progress { read: 1, .. })));

        handle.cancel();
        assert!(matches!(handle.wait(), Err(ReadError::Cancelled)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_reads_input_without_reported_length() {
        let path = Path::new("/proc/self/cmdline");
        assert_eq!(std::fs::metadata(path).unwrap().len(), 0);
        let expected = String::from_utf8(std::fs::read(path).unwrap()).unwrap();
        assert!(!expected.is_empty());

        let text = ChunkReader::spawn(path, 4).wait().unwrap();
        assert_eq!(text, expected);
    }

    #[test]
    fn test_settle_reports_panic_as_crash() {
        let path = Path::new("dml.sql");
        let panicked: thread::Result<()> = Err(Box::new("boom"));
        assert!(matches!(
            settle(Err(ReadError::Cancelled), panicked, path),
            Err(ReadError::Crashed { .. })
        ));

        let panicked: thread::Result<()> = Err(Box::new("boom"));
        assert!(matches!(
            settle(Ok("SELECT 1;".to_string()), panicked, path),
            Ok(ref text) if text == "SELECT 1;"
        ));

        assert!(matches!(
            settle(Err(ReadError::Cancelled), Ok(()), path),
            Err(ReadError::Cancelled)
        ));
    }
}

//! Background and file-system services
//!
//! - Chunked file reading on a worker thread
//! - Per-tab load tracking
//! - Export of tab content and the example template

pub mod chunk_reader;
pub mod export;
pub mod file_loader;

pub use chunk_reader::DEFAULT_CHUNK_SIZE;
pub use export::{export_tab, write_example, ExportFormat};
pub use file_loader::{FileLoader, LoadOutcome};

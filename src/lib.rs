pub mod cli;
pub mod driver;
pub mod export;
pub mod inventory;
pub mod logging;
pub mod normalize;
pub mod prompt;
pub mod scan;
pub mod scanner;
pub mod shutdown;
pub mod table;
pub mod tui;
pub mod types;

// Re-export key types and functions at the crate root
pub use driver::{DriverConfig, ExportOutcome, LoopDriver, LoopState};
pub use export::{export, ExportError, ExportFormat};
pub use inventory::{Inventory, MergeStats, DEFAULT_SIGNAL_FLOOR};
pub use normalize::normalize;
pub use prompt::{DialoguerPrompter, PromptError, Prompter};
pub use scan::IwScanner;
pub use scanner::{ScanError, ScanSource};
pub use table::{render, Table, TableRow};
pub use tui::{init_terminal, restore_terminal, RenderSink, TuiSink};
pub use types::{AkmTag, Encryption, NetworkRecord, RawObservation, Security};
pub use logging::{get_log_file_path, init_logging, LogSettings};

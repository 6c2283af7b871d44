//! NetWeaver
//!
//! Measures one-way network latency between a virtualized guest's virtual
//! interface (vif) and the hypervisor's physical interface (pif) by
//! correlating timestamped packet captures of the same synthetic traffic
//! stream taken at both observation points.

pub mod app;
pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod output;
pub mod session;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{CapturedMapping, ColumnLayout, Config, LineOutcome, TransitStatistics};
pub use normalizer::{normalize_file, normalize_lines};
pub use output::{ColoredFormatter, OutputFormatter, OutputFormatterFactory, PlainFormatter};
pub use session::{RemoteExecutor, RemoteSession};
pub use stats::compute_statistics;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    /// Packets generated per run; also bounds both capture durations.
    pub const DEFAULT_PACKET_COUNT: u32 = 1000;
    pub const DEFAULT_HOST_INTERFACE: &str = "eth0";
    pub const DEFAULT_VIF_NUMBER: u32 = 0;
    pub const DEFAULT_REMOTE_USER: &str = "root";
    pub const DEFAULT_REMOTE_CAPTURE_DIR: &str = "/tmp";
    /// Seconds to wait after the captures join so `tee` output flushes.
    pub const DEFAULT_SETTLE_SECONDS: u64 = 5;

    // tcpdump -tttt prints the time-of-day in column 1 and, for TCP, the
    // sequence range ("12345:12345(0)") in column 7.
    pub const DEFAULT_TIMESTAMP_COLUMN: usize = 1;
    pub const DEFAULT_SEQUENCE_COLUMN: usize = 7;
    pub const DEFAULT_SEQUENCE_SPLIT: &str = ":";
    pub const DEFAULT_SEQUENCE_SPLIT_INDEX: usize = 0;

    pub const DEFAULT_ENABLE_COLOR: bool = true;
}

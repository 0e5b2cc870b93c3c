//! Error taxonomy of a scan run.
//!
//! Scan and persistence failures propagate to the caller unchanged. Hostname
//! lookups have no error type at all: a failed lookup is
//! [`Hostname::Unresolved`](crate::network::device::Hostname::Unresolved).

use std::io;
use std::net::Ipv4Addr;
use std::path::PathBuf;

use thiserror::Error;

use crate::report::ScanResult;

#[derive(Debug, Error)]
pub enum ScanError {
    /// The raw datalink socket could not be opened (missing root / CAP_NET_RAW).
    #[error("insufficient privileges to open a raw socket on {interface}: {source}")]
    Permission {
        interface: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid address range: {0}")]
    InvalidRange(String),

    /// No local broadcast-capable interface can originate frames for the range.
    #[error("no usable network interface for {0}")]
    NoInterface(Ipv4Addr),

    #[error("failed to transmit discovery frame: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Directory creation, file creation or write failed. A partially written
    /// file is left in place.
    #[error("failed to write results to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: impl Into<io::Error>) -> Self {
        Self::Io {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Persisting failed after a successful scan. The gathered result is kept.
    #[error("scan succeeded but results were not saved: {source}")]
    Persist {
        result: Box<ScanResult>,
        #[source]
        source: StoreError,
    },
}

impl RunError {
    /// The scan result, if one was computed before the failure.
    pub fn result(&self) -> Option<&ScanResult> {
        match self {
            RunError::Scan(_) => None,
            RunError::Persist { result, .. } => Some(&**result),
        }
    }
}

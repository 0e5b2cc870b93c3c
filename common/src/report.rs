use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::network::device::Device;

/// Outcome of one scan run.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Unique by IP address, in the order the replies arrived.
    pub devices: Vec<Device>,
    pub started_at: DateTime<Local>,
    /// From request construction to the end of hostname resolution.
    pub duration: Duration,
    /// `true` iff at least one device answered.
    pub found: bool,
    /// Where the device table was written, if it was.
    pub saved_to: Option<PathBuf>,
}

impl ScanResult {
    pub fn new(devices: Vec<Device>, started_at: DateTime<Local>, duration: Duration) -> Self {
        Self {
            found: !devices.is_empty(),
            devices,
            started_at,
            duration,
            saved_to: None,
        }
    }

    pub fn empty(started_at: DateTime<Local>, duration: Duration) -> Self {
        Self::new(Vec::new(), started_at, duration)
    }
}

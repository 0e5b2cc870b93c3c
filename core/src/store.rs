//! Writes a device table as CSV (`IP,MAC,Hostname`).
//!
//! Writing is best effort: if it fails halfway, the partial file is left on
//! disk and the error names its path.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use mnat_common::error::StoreError;
use mnat_common::network::device::Device;
use mnat_common::output::OutputTarget;

pub const FILE_PREFIX: &str = "mnet.scan.";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
pub const HEADER: [&str; 3] = ["IP", "MAC", "Hostname"];

/// Same-second saves into one directory get `_001`, `_002`, ... suffixes below this bound.
const MAX_NAME_ATTEMPTS: u32 = 1_000;

#[derive(Debug, Default, Clone)]
pub struct ResultStore;

impl ResultStore {
    pub fn new() -> Self {
        Self
    }

    /// Saves `devices` to `target` and returns the path actually written.
    pub fn save(&self, devices: &[Device], target: &OutputTarget) -> Result<PathBuf, StoreError> {
        self.save_at(devices, target, Local::now())
    }

    /// Like [`save`](Self::save), with `now` naming the file in directory mode.
    pub fn save_at(
        &self,
        devices: &[Device],
        target: &OutputTarget,
        now: DateTime<Local>,
    ) -> Result<PathBuf, StoreError> {
        let (path, file) = match target {
            OutputTarget::Directory(dir) => {
                fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
                create_unique(dir, &now)?
            }
            OutputTarget::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
                }
                let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
                (path.clone(), file)
            }
        };

        write_devices(file, devices).map_err(|e| StoreError::io(&path, e))?;
        debug!("Wrote {} rows to {}", devices.len(), path.display());
        Ok(path)
    }
}

/// `mnet.scan.<YYYYMMDDHHMMSS>.csv`, or `mnet.scan.<ts>_<nnn>.csv` for `attempt > 0`.
///
/// `_` sorts after `.` and the counter is zero padded, so a plain listing of
/// the directory follows save order.
pub fn file_name(now: &DateTime<Local>, attempt: u32) -> String {
    let timestamp = now.format(TIMESTAMP_FORMAT);
    match attempt {
        0 => format!("{FILE_PREFIX}{timestamp}.csv"),
        n => format!("{FILE_PREFIX}{timestamp}_{n:03}.csv"),
    }
}

fn create_unique(dir: &Path, now: &DateTime<Local>) -> Result<(PathBuf, File), StoreError> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path: PathBuf = dir.join(file_name(now, attempt));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(StoreError::io(path, e)),
        }
    }
    Err(StoreError::io(
        dir,
        io::Error::new(io::ErrorKind::AlreadyExists, "too many scans saved within one second"),
    ))
}

fn write_devices(file: File, devices: &[Device]) -> io::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(BufWriter::new(file));

    writer.write_record(HEADER)?;
    for device in devices {
        writer.write_record(device.to_record())?;
    }
    writer.flush()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

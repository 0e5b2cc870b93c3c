use std::path::{Path, PathBuf};

/// Where a scan's device table is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// A directory; the file name is derived from the current time.
    Directory(PathBuf),
    /// An explicit file path, overwritten if it exists.
    File(PathBuf),
}

impl OutputTarget {
    /// Classifies a user supplied path.
    ///
    /// An existing directory, or a path that does not exist yet and has no
    /// extension, is treated as a directory. Anything else is a file path.
    pub fn classify(path: impl AsRef<Path>) -> Self {
        let path: &Path = path.as_ref();
        if path.is_dir() || (!path.exists() && path.extension().is_none()) {
            OutputTarget::Directory(path.to_path_buf())
        } else {
            OutputTarget::File(path.to_path_buf())
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            OutputTarget::Directory(path) | OutputTarget::File(path) => path,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

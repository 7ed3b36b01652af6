use std::path::PathBuf;

/// One configured (local file, remote template) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupTarget {
    /// Section name in the config, unique within one config.
    pub name: String,
    /// Remote path template. Its extension is replaced on upload.
    pub remote_path: String,
    /// Absolute path of the local file to upload.
    pub local_path: PathBuf,
}

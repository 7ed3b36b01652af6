use std::fmt;
use std::path::PathBuf;

/// Everything needed to open an authenticated channel to the backup host.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub key_file: PathBuf,
    /// `None` means the key is unencrypted. An empty configured value
    /// is normalised to `None` at load time.
    pub passphrase: Option<String>,
}

impl ConnectionParams {
    /// Default SSH port used when the config does not set one.
    pub const DEFAULT_PORT: u16 = 22;

    /// `user@host:port`, for messages.
    pub fn display_target(&self) -> String {
        format!("{}@{}:{}", self.user, self.host, self.port)
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("key_file", &self.key_file)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

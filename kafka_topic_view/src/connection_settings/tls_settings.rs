use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsSettings {
    pub ca_file: Option<PathBuf>,
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
    pub insecure_skip_verify: bool,
}

impl TlsSettings {
    /// TLS is switched on by a CA file or by skipping verification.
    pub fn enabled(&self) -> bool {
        self.ca_file.is_some() || self.insecure_skip_verify
    }

    /// Client certificate and key, only when both are set.
    pub fn client_identity(&self) -> Option<(&PathBuf, &PathBuf)> {
        self.cert_file.as_ref().zip(self.key_file.as_ref())
    }
}

/// A named byte sequence destined for an archive or a direct download.
///
/// Fields are private so an artifact cannot change after it is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    name: String,
    bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

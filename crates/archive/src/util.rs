use crate::ArchiveFormat;
use std::fmt::{Display, Formatter, Result as FmtResult};

impl Display for ArchiveFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for ArchiveFormat {
    fn as_ref(&self) -> &'static str {
        self.as_str()
    }
}

impl ArchiveFormat {
    /// Returns the short name (for displaying to user)
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::Rar => "rar",
            ArchiveFormat::SevenZip => "7z",
            ArchiveFormat::Tar => "tar",
            ArchiveFormat::Pdf => "pdf",
        }
    }

    /// Verify that `bytes` start with the expected magic bytes for this format.
    ///
    /// Useful for cross-checking a format detected from a file extension
    /// against actual file contents; comic archives are frequently renamed
    /// (a `.cbr` that is really a zip file, and vice versa).
    #[must_use]
    pub fn check_magic_bytes(&self, bytes: &[u8]) -> bool {
        Self::from_magic_bytes(bytes).is_some_and(|f| *self == f)
    }
}

#[cfg(test)]
mod tests {
    use crate::ArchiveFormat;

    #[test]
    fn test_check_magic_bytes() {
        assert!(ArchiveFormat::Zip.check_magic_bytes(b"PK\x03\x04"));
        assert!(!ArchiveFormat::Zip.check_magic_bytes(b"Rar!\x1A\x07\x01\x00"));
        assert!(!ArchiveFormat::Pdf.check_magic_bytes(b""));
    }
}

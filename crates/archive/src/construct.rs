use crate::ArchiveFormat;
use crate::error::{Error, ErrorKind};
use std::{path::Path, str::FromStr};

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
// An archive with no entries only contains the end-of-central-directory record.
const ZIP_EMPTY_MAGIC: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];
const RAR_MAGIC: [u8; 6] = [0x52, 0x61, 0x72, 0x21, 0x1A, 0x07];
const SEVEN_ZIP_MAGIC: [u8; 6] = [0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C];
const PDF_MAGIC: &[u8] = b"%PDF-";
const TAR_MAGIC: &[u8] = b"ustar";
const TAR_MAGIC_OFFSET: usize = 257;

/// Number of leading bytes needed to recognise every supported format.
pub(crate) const MAGIC_WINDOW: usize = TAR_MAGIC_OFFSET + 8;

impl FromStr for ArchiveFormat {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "cbz" | "zip" => Ok(ArchiveFormat::Zip),
            "cbr" | "rar" => Ok(ArchiveFormat::Rar),
            "cb7" | "7z" => Ok(ArchiveFormat::SevenZip),
            "cbt" | "tar" => Ok(ArchiveFormat::Tar),
            "pdf" => Ok(ArchiveFormat::Pdf),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(s.to_string())),
        }
    }
}
impl ArchiveFormat {
    /// Detect the archive format from a file extension.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref().extension().and_then(|ext| ext.to_str()).and_then(|ext| ext.parse().ok())
    }

    /// Detect the archive format from the leading bytes of a file.
    ///
    /// Tar detection requires at least [`MAGIC_WINDOW`] bytes; every other
    /// format is recognised from the first few bytes.
    #[must_use]
    pub fn from_magic_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&ZIP_MAGIC) || bytes.starts_with(&ZIP_EMPTY_MAGIC) {
            Some(ArchiveFormat::Zip)
        } else if bytes.starts_with(&RAR_MAGIC) {
            Some(ArchiveFormat::Rar)
        } else if bytes.starts_with(&SEVEN_ZIP_MAGIC) {
            Some(ArchiveFormat::SevenZip)
        } else if bytes.starts_with(PDF_MAGIC) {
            Some(ArchiveFormat::Pdf)
        } else if bytes.get(TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + TAR_MAGIC.len()) == Some(TAR_MAGIC) {
            Some(ArchiveFormat::Tar)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ArchiveFormat;
    use rstest::rstest;

    #[rstest]
    #[case("issue.cbz", Some(ArchiveFormat::Zip))]
    #[case("issue.CBZ", Some(ArchiveFormat::Zip))]
    #[case("issue.zip", Some(ArchiveFormat::Zip))]
    #[case("issue.cbr", Some(ArchiveFormat::Rar))]
    #[case("issue.cb7", Some(ArchiveFormat::SevenZip))]
    #[case("issue.cbt", Some(ArchiveFormat::Tar))]
    #[case("issue.pdf", Some(ArchiveFormat::Pdf))]
    #[case("issue.jpg", None)]
    #[case("issue", None)]
    fn test_from_path(#[case] path: &str, #[case] expected: Option<ArchiveFormat>) {
        assert_eq!(ArchiveFormat::from_path(path), expected);
    }

    #[test]
    fn test_from_magic_bytes() {
        assert_eq!(ArchiveFormat::from_magic_bytes(b"PK\x03\x04rest"), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::from_magic_bytes(b"PK\x05\x06"), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::from_magic_bytes(b"Rar!\x1A\x07\x00"), Some(ArchiveFormat::Rar));
        assert_eq!(ArchiveFormat::from_magic_bytes(b"%PDF-1.7"), Some(ArchiveFormat::Pdf));
        assert_eq!(ArchiveFormat::from_magic_bytes(&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C]), Some(ArchiveFormat::SevenZip));
        let mut tar = vec![0u8; 512];
        tar[257..262].copy_from_slice(b"ustar");
        assert_eq!(ArchiveFormat::from_magic_bytes(&tar), Some(ArchiveFormat::Tar));
        assert_eq!(ArchiveFormat::from_magic_bytes(b"not an archive"), None);
        assert_eq!(ArchiveFormat::from_magic_bytes(&[]), None);
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("lz4".parse::<ArchiveFormat>().is_err());
    }
}

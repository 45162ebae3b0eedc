//! Fixtures shared by the unit tests.

use cbnorm_config::Registry;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub(crate) const BANNER: &[u8] = b"scanner banner bytes";
pub(crate) const CREDITS_PAGE: &[u8] = b"scan group credits page";

pub(crate) fn registry() -> Registry {
    Registry::new()
        .with_metadata_file("ComicInfo.xml")
        .with_scene_group("TeamX-release")
        .with_hashed_file(hex::encode_upper(Sha256::digest(BANNER)), "Scanner banner")
        // Stored uppercased whatever the input case.
        .with_hashed_file(hex::encode(Sha256::digest(CREDITS_PAGE)), "Group credits")
}

/// Write a tiny, decodable JPEG.
pub(crate) fn jpeg(path: &Path) {
    image::RgbImage::from_pixel(4, 4, image::Rgb([200, 30, 30]))
        .save_with_format(path, image::ImageFormat::Jpeg)
        .unwrap();
}

/// Relative path to content of every file under `dir`.
pub(crate) fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(dir)
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.file_type().is_file())
        .map(|e| (e.path().strip_prefix(dir).unwrap().to_path_buf(), fs::read(e.path()).unwrap()))
        .collect()
}

/// Build a zip archive at `path` from `(name, content)` pairs.
pub(crate) fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let mut writer = zip::ZipWriter::new(fs::File::create(path).unwrap());
    for (name, content) in entries {
        writer.start_file(*name, zip::write::SimpleFileOptions::default()).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
}

/// Entry names of the zip archive at `path`, sorted.
pub(crate) fn zip_entries(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut names: Vec<_> = archive.file_names().map(String::from).collect();
    names.sort();
    names
}

/// Encoded JPEG bytes, for embedding in test archives.
pub(crate) fn jpeg_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    image::RgbImage::from_pixel(4, 4, image::Rgb([30, 30, 200]))
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
        .unwrap();
    bytes
}

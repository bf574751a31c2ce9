#![allow(dead_code)]

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, RgbaImage};
use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const MIMETYPE: &[u8] = b"application/epub+zip";

pub const CONTAINER_XML: &[u8] = br#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

/// One entry read back from an archive.
#[derive(Debug, Clone)]
pub struct ReadEntry {
    pub name: String,
    pub data: Vec<u8>,
    pub method: CompressionMethod,
    pub is_dir: bool,
}

/// Busy but smooth picture, so JPEG sizes behave like real photos.
pub fn photo(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x / 8 + y / 8) % 2 * 120 + 60) as u8,
        ])
    })
}

pub fn jpeg_bytes(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(&photo(width, height))
        .unwrap();
    buf
}

pub fn png_bytes(img: DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

pub fn rgba_png_bytes(img: RgbaImage) -> Vec<u8> {
    png_bytes(DynamicImage::ImageRgba8(img))
}

/// Writes an EPUB-shaped zip: `mimetype` stored first, then `entries`
/// deflated in the given order. Names ending in '/' become directories.
pub fn write_epub(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    writer
        .start_file(
            "mimetype",
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
        )
        .unwrap();
    writer.write_all(MIMETYPE).unwrap();

    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, deflated).unwrap();
        } else {
            writer.start_file(*name, deflated).unwrap();
            writer.write_all(data).unwrap();
        }
    }
    writer.finish().unwrap();
}

pub fn read_entries(path: &Path) -> Vec<ReadEntry> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            ReadEntry {
                name: file.name().to_string(),
                method: file.compression(),
                is_dir: file.is_dir(),
                data,
            }
        })
        .collect()
}

pub fn entry<'a>(entries: &'a [ReadEntry], name: &str) -> &'a ReadEntry {
    entries
        .iter()
        .find(|e| e.name == name)
        .unwrap_or_else(|| panic!("missing entry {}", name))
}

pub fn entry_names(entries: &[ReadEntry]) -> Vec<String> {
    entries.iter().map(|e| e.name.clone()).collect()
}

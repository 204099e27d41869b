#![allow(dead_code)]

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use comic_pages::prelude::*;
use zip::{ZipWriter, write::FileOptions};

pub const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
pub const JPEG_MAGIC: &[u8] = b"\xff\xd8\xff\xe0\0\x10JFIF\0";

/// Distinct page content: even pages sniff as PNG, odd ones as JPEG. Pages
/// are longer than the sniffed prefix.
pub fn page(i: usize) -> Vec<u8> {
    let mut data = if i % 2 == 0 {
        PNG_MAGIC.to_vec()
    } else {
        JPEG_MAGIC.to_vec()
    };
    data.extend(format!("page {}", i).bytes());
    data.extend((0..4096 + i).map(|b| (b * 31 + i) as u8));
    data
}

pub fn page_name(i: usize) -> String {
    let ext = if i % 2 == 0 { "png" } else { "jpg" };
    format!("page_{:03}.{}", i, ext)
}

/// `count` pages named so that name order is page order.
pub fn book(count: usize) -> Vec<(String, Vec<u8>)> {
    (0..count).map(|i| (page_name(i), page(i))).collect()
}

pub fn write_cbz(dir: &Path, name: &str, entries: &[(String, Vec<u8>)]) -> PathBuf {
    let path = dir.join(name);
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, data) in entries {
        zip.start_file(name.as_str(), options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
    path
}

/// Read every page one after another, the slow way.
pub fn sequential_pages(path: &Path) -> Vec<Vec<u8>> {
    let source = ArchiveSource::open(path).unwrap();
    let mut reader = source.reader().unwrap();
    source
        .walk()
        .unwrap()
        .map(|task| {
            let task = task.unwrap();
            let mut data = Vec::new();
            reader.open(&task.path).unwrap().read_to_end(&mut data).unwrap();
            data
        })
        .collect()
}

pub fn settings(workers: usize) -> Settings {
    Settings {
        workers: Some(workers),
        ..Settings::default()
    }
}

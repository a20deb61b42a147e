//! Pulling the scanner executable out of a downloaded release archive.

use std::io::{self, Cursor, Write};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::platform::ArchiveFormat;

/// Copy the regular-file member named `binary_name` out of an in-memory archive.
///
/// The member may sit at any depth; only its final path component is compared.
/// Returns `Ok(false)` when the archive holds no such member.
pub(crate) fn extract_member(
    bytes: &[u8],
    format: ArchiveFormat,
    binary_name: &str,
    dest: &mut impl Write,
) -> io::Result<bool> {
    match format {
        ArchiveFormat::TarGz => extract_from_tar_gz(bytes, binary_name, dest),
        ArchiveFormat::Zip => extract_from_zip(bytes, binary_name, dest),
    }
}

fn extract_from_tar_gz(bytes: &[u8], binary_name: &str, dest: &mut impl Write) -> io::Result<bool> {
    let mut archive = tar::Archive::new(GzDecoder::new(bytes));
    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        if is_named(&entry.path()?, binary_name) {
            io::copy(&mut entry, dest)?;
            return Ok(true);
        }
    }
    Ok(false)
}

fn extract_from_zip(bytes: &[u8], binary_name: &str, dest: &mut impl Write) -> io::Result<bool> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(io::Error::other)?;
    for index in 0..archive.len() {
        let mut file = archive.by_index(index).map_err(io::Error::other)?;
        if !file.is_file() {
            continue;
        }
        let matches = file
            .enclosed_name()
            .is_some_and(|path| is_named(&path, binary_name));
        if matches {
            io::copy(&mut file, dest)?;
            return Ok(true);
        }
    }
    Ok(false)
}

fn is_named(path: &Path, binary_name: &str) -> bool {
    path.file_name().is_some_and(|name| name == binary_name)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    /// Build a `.tar.gz` holding the given (path, contents) members.
    pub fn tar_gz(members: &[(&str, &[u8])]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (path, data) in members {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o755);
            builder.append_data(&mut header, path, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    /// Build a `.zip` holding the given (path, contents) members.
    pub fn zip(members: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (path, data) in members {
            writer.start_file(*path, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures;
    use super::*;

    #[test]
    fn extracts_binary_from_tar_gz_root() {
        let archive = fixtures::tar_gz(&[
            ("LICENSE", b"MIT"),
            ("README.md", b"# gitleaks"),
            ("gitleaks", b"#!/bin/sh\nexit 0\n"),
        ]);
        let mut out = Vec::new();
        assert!(extract_member(&archive, ArchiveFormat::TarGz, "gitleaks", &mut out).unwrap());
        assert_eq!(out, b"#!/bin/sh\nexit 0\n");
    }

    #[test]
    fn extracts_binary_from_nested_tar_gz_directory() {
        let archive = fixtures::tar_gz(&[("gitleaks_8.21.2/gitleaks", b"nested")]);
        let mut out = Vec::new();
        assert!(extract_member(&archive, ArchiveFormat::TarGz, "gitleaks", &mut out).unwrap());
        assert_eq!(out, b"nested");
    }

    #[test]
    fn similarly_named_members_do_not_match() {
        let archive = fixtures::tar_gz(&[("gitleaks.md", b"docs"), ("not-gitleaks", b"x")]);
        let mut out = Vec::new();
        assert!(!extract_member(&archive, ArchiveFormat::TarGz, "gitleaks", &mut out).unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn extracts_exe_from_zip() {
        let archive = fixtures::zip(&[("LICENSE", b"MIT"), ("gitleaks.exe", b"MZ")]);
        let mut out = Vec::new();
        assert!(extract_member(&archive, ArchiveFormat::Zip, "gitleaks.exe", &mut out).unwrap());
        assert_eq!(out, b"MZ");
    }

    #[test]
    fn zip_without_member_reports_missing() {
        let archive = fixtures::zip(&[("LICENSE", b"MIT")]);
        let mut out = Vec::new();
        assert!(!extract_member(&archive, ArchiveFormat::Zip, "gitleaks.exe", &mut out).unwrap());
    }

    #[test]
    fn corrupt_archive_is_an_io_error() {
        let mut out = Vec::new();
        assert!(extract_member(b"not an archive", ArchiveFormat::TarGz, "gitleaks", &mut out).is_err());
        assert!(extract_member(b"not an archive", ArchiveFormat::Zip, "gitleaks", &mut out).is_err());
    }
}

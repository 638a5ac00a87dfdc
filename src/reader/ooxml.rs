//! Shared plumbing for the zip + XML based readers.

use crate::error::{Off2TxtError, Result};
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

pub(crate) fn open_archive<R: Read + Seek>(reader: R, path: &Path) -> Result<ZipArchive<R>> {
    ZipArchive::new(reader).map_err(|e| Off2TxtError::archive(path, e))
}

/// Read a part from the archive as UTF-8 text.
pub(crate) fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &Path,
    part: &str,
) -> Result<String> {
    let mut file = archive
        .by_name(part)
        .map_err(|e| Off2TxtError::archive(path, format!("missing part '{}': {}", part, e)))?;

    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;

    String::from_utf8(buffer).map_err(|e| Off2TxtError::xml(part, e))
}

/// Like [`read_part`], but a missing part is not an error.
pub(crate) fn read_optional_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &Path,
    part: &str,
) -> Result<Option<String>> {
    if archive.by_name(part).is_err() {
        return Ok(None);
    }
    read_part(archive, path, part).map(Some)
}

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Local names of the currently open elements, outermost first.
#[derive(Debug, Default)]
pub(crate) struct ElementStack {
    names: Vec<Vec<u8>>,
}

impl ElementStack {
    pub fn push(&mut self, qualified: &[u8]) {
        self.names.push(local_name(qualified).to_vec());
    }

    pub fn pop(&mut self) -> Option<Vec<u8>> {
        self.names.pop()
    }

    pub fn last_is(&self, name: &[u8]) -> bool {
        self.names.last().is_some_and(|n| n == name)
    }

    pub fn count(&self, name: &[u8]) -> usize {
        self.names.iter().filter(|n| n.as_slice() == name).count()
    }

    /// True when `child` is open as a direct child of `parent` anywhere in the stack.
    pub fn has_pair(&self, parent: &[u8], child: &[u8]) -> bool {
        self.names
            .windows(2)
            .any(|w| w[0] == parent && w[1] == child)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    /// Build an in-memory zip archive from (part name, contents) pairs.
    pub fn build_archive(parts: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, contents) in parts {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        let mut cursor = writer.finish().unwrap();
        cursor.set_position(0);
        cursor
    }
}

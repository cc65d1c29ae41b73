//! Resource names and output file naming.

use std::{
    borrow::Cow,
    fs::File,
    io,
    path::{Path, PathBuf},
};

/// Placeholder used when a resource has no usable name
pub const UNNAMED: &str = "unnamed";

/// The name offsets and the NUL separated name blob of an archive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameTable {
    offsets: Vec<u32>,
    blob: Vec<u8>,
}

impl NameTable {
    pub fn new(offsets: Vec<u32>, blob: Vec<u8>) -> Self {
        Self { offsets, blob }
    }

    /// Number of name offsets, one per logical record
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Raw bytes of the name at `index`, up to the next NUL or the end of the blob.
    ///
    /// An offset pointing past the blob yields an empty name.
    pub fn raw(&self, index: usize) -> Option<&[u8]> {
        let offset = *self.offsets.get(index)? as usize;
        let tail = self.blob.get(offset..).unwrap_or_default();
        let end = tail.iter().position(|b| *b == 0).unwrap_or(tail.len());
        Some(&tail[..end])
    }

    /// The name at `index`, decoded lossily.
    pub fn name(&self, index: usize) -> Option<Cow<'_, str>> {
        self.raw(index).map(String::from_utf8_lossy)
    }
}

/// Replace every character that cannot appear in a file name on common platforms with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    if name.is_empty() {
        return UNNAMED.to_owned();
    }

    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_ascii_control() => '_',
            c => c,
        })
        .collect()
}

/// Create a file at `path`, or at the first free `stem_N.ext` sibling if it is taken.
///
/// Existing files are never truncated.
pub fn create_unique(path: &Path) -> io::Result<(PathBuf, File)> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

    let mut candidate = path.to_path_buf();
    for i in 1u32.. {
        match File::create_new(&candidate) {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                let name = match &extension {
                    Some(ext) => format!("{stem}_{i}.{ext}"),
                    None => format!("{stem}_{i}"),
                };
                candidate = path.with_file_name(name);
            }
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free file name for {}", path.display()),
    ))
}

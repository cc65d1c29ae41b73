//! Section decompression handling.

use std::io::{self, Read, Seek};

use flate2::read::ZlibDecoder;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{Error, Result},
    types::TypeSection,
};

/// Leading byte of every zlib stream the archives use
const ZLIB_MARKER: u8 = 0x78;

/// LZMA properties byte for lc=3, lp=0, pb=2
const LZMA_DEFAULT_PROPERTIES: u8 = 0x5D;

/// Identifies the codec used for a compressed section
///
/// Sections do not declare their codec, it is recognised from the first byte of the blob.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Codec {
    /// A zlib stream, always starting with `0x78`
    Zlib,

    /// A raw LZMA stream without the `.lzma` header, using default properties
    Lzma,
}

impl Codec {
    pub fn detect(data: &[u8]) -> Codec {
        match data.first() {
            Some(&ZLIB_MARKER) => Codec::Zlib,
            _ => Codec::Lzma,
        }
    }

    /// Decompress `data` into at most `expected` bytes.
    ///
    /// A stream that ends early yields fewer bytes, which callers must check.
    pub fn decompress(self, data: &[u8], expected: usize) -> Result<Vec<u8>> {
        match self {
            Codec::Zlib => inflate_zlib(data, expected),
            Codec::Lzma => decode_lzma(data, expected),
        }
    }
}

fn inflate_zlib(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(expected);
    let result = ZlibDecoder::new(data)
        .take(expected as u64)
        .read_to_end(&mut output);

    keep_partial(result, output, "zlib")
}

fn decode_lzma(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    // The archive omits the .lzma header, so rebuild properties and dictionary size from the
    // defaults. The unpacked size stays unknown so a stream ending early still yields its bytes.
    let dictionary_size = u32::try_from(expected).unwrap_or(u32::MAX).max(4096);
    let mut header = [0u8; 5];
    header[0] = LZMA_DEFAULT_PROPERTIES;
    header[1..5].copy_from_slice(&dictionary_size.to_le_bytes());

    let options = lzma_rs::decompress::Options {
        unpacked_size: lzma_rs::decompress::UnpackedSize::UseProvided(None),
        allow_incomplete: true,
        ..Default::default()
    };

    let mut output = Vec::with_capacity(expected);
    let result = lzma_rs::lzma_decompress_with_options(
        &mut header.as_slice().chain(data),
        &mut output,
        &options,
    );
    output.truncate(expected);

    keep_partial(result, output, "lzma")
}

/// Turn a codec error into a short buffer when the codec produced anything before failing.
fn keep_partial<T, E: std::fmt::Display>(
    result: core::result::Result<T, E>,
    output: Vec<u8>,
    codec: &str,
) -> Result<Vec<u8>> {
    match result {
        Ok(_) => Ok(output),
        Err(e) if !output.is_empty() => {
            debug!(codec, produced = output.len(), error = %e, "stream ended early");
            Ok(output)
        }
        Err(e) => Err(Error::Decompression(format!("{codec}: {e}"))),
    }
}

/// What is known about the bytes of one type section
#[derive(Debug, Clone, PartialEq)]
pub enum SectionData {
    /// Stored uncompressed, parts are read straight from the archive file
    Raw,

    /// Compressed in the archive and expanded in memory
    Decompressed(Vec<u8>),

    /// Could not be located, read or decompressed
    Unavailable,
}

/// The decompressed state of every type section of an archive
///
/// Buffers are produced once when the archive is opened and are read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionBuffers {
    sections: Vec<SectionData>,
}

impl SectionBuffers {
    /// Load and decompress every compressed section.
    ///
    /// Problems with a single section are logged and leave it [`SectionData::Unavailable`].
    #[instrument(skip_all, fields(sections = sections.len()))]
    pub fn load<R: Read + Seek>(reader: &mut R, file_len: u64, sections: &[TypeSection]) -> Self {
        Self {
            sections: sections
                .iter()
                .enumerate()
                .map(|(index, section)| load_section(reader, file_len, index, section))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SectionData> {
        self.sections.get(index)
    }

    /// The decompressed bytes of a section, if it has any
    pub fn data(&self, index: usize) -> Option<&[u8]> {
        match self.sections.get(index)? {
            SectionData::Decompressed(data) => Some(data),
            _ => None,
        }
    }
}

fn load_section<R: Read + Seek>(
    reader: &mut R,
    file_len: u64,
    index: usize,
    section: &TypeSection,
) -> SectionData {
    let Some(offset) = section.byte_offset().filter(|offset| *offset <= file_len) else {
        warn!(
            section = index,
            units = section.data_file_offset,
            "section offset lies beyond the end of the file, skipping"
        );
        return SectionData::Unavailable;
    };

    if !section.is_compressed() {
        debug!(
            section = index,
            offset,
            size = section.data_byte_size,
            "section is not compressed"
        );
        return SectionData::Raw;
    }

    let compressed_size = section.compressed_byte_size as u64;
    if offset + compressed_size > file_len {
        warn!(
            section = index,
            offset, compressed_size, "compressed section extends beyond the end of the file"
        );
        return SectionData::Unavailable;
    }

    let mut compressed = vec![0u8; compressed_size as usize];
    if let Err(e) = reader
        .seek(io::SeekFrom::Start(offset))
        .and_then(|_| reader.read_exact(&mut compressed))
    {
        warn!(section = index, error = %e, "short read of compressed section");
        return SectionData::Unavailable;
    }

    let codec = Codec::detect(&compressed);
    let expected = section.data_byte_size as usize;
    match codec.decompress(&compressed, expected) {
        Ok(data) => {
            if data.len() != expected {
                warn!(
                    section = index,
                    ?codec,
                    produced = data.len(),
                    expected,
                    "decompressed size does not match the declared size"
                );
            }
            info!(section = index, ?codec, size = data.len(), "decompressed section");
            SectionData::Decompressed(data)
        }
        Err(e) => {
            warn!(section = index, ?codec, error = %e, "unable to decompress section");
            SectionData::Unavailable
        }
    }
}

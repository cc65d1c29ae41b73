//! Types for reading rpack archives
//!

use binrw::BinRead;
use byteorder::{LittleEndian, ReadBytesExt};
use std::{
    borrow::Cow,
    io::{self, Read, Seek},
};
use tracing::{debug, instrument, trace, warn};

use crate::{
    compression::{SectionBuffers, SectionData},
    error::{Error, Result},
    names::{sanitize_file_name, NameTable},
    resource_type::display_name,
    types::{
        absolute_offset, units_to_bytes, ArchiveHeader, LogicalRecord, PhysicalRecord,
        TypeSection,
    },
};

/// What to do with parts stored in compressed sections
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CompressedSections {
    /// Read them from the decompressed section buffer
    #[default]
    Decompress,

    /// Leave them out, continuing with the next part of the resource
    Skip,
}

/// Description of a logical resource, without its data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    /// Position of the resource in the logical record table
    pub index: usize,

    /// Sanitized name, safe to use as a file name
    pub name: String,

    pub file_type: u8,

    /// Display name of `file_type`
    pub type_name: &'static str,

    pub first_resource: usize,

    pub part_count: usize,
}

/// A logical resource with the bytes of its parts loaded
///
/// Produced by [`RpackArchive::assemble`] and consumed by [`crate::write::write_resource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledResource {
    pub index: usize,
    pub base_name: String,
    pub type_name: &'static str,
    pub file_type: u8,
    pub parts: Vec<Vec<u8>>,
}

impl AssembledResource {
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// rpack archive reader
///
/// Opening an archive parses all of its tables and decompresses every compressed section up
/// front, the data of individual resources is read on demand.
///
/// ```no_run
/// use std::io::prelude::*;
/// use rpack_archive::read::CompressedSections;
///
/// fn list_rpack_contents(reader: impl Read + Seek) -> rpack_archive::error::Result<()> {
///     let mut rpack = rpack_archive::RpackArchive::new(reader)?;
///
///     for i in 0..rpack.len() {
///         let resource = rpack.assemble(i, CompressedSections::Decompress)?;
///         let parts = resource.parts.len();
///         println!("{}/{}: {parts} parts", resource.type_name, resource.base_name);
///     }
///
///     Ok(())
/// }
/// ```
pub struct RpackArchive<R> {
    reader: R,
    file_len: u64,
    header: ArchiveHeader,
    sections: Vec<TypeSection>,
    physical: Vec<PhysicalRecord>,
    logical: Vec<LogicalRecord>,
    names: NameTable,
    buffers: SectionBuffers,
}

impl<R> RpackArchive<R> {
    /// Number of logical resources in the archive
    pub fn len(&self) -> usize {
        self.logical.len()
    }

    /// Whether this archive contains no logical resources
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total size of the archive file in bytes
    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    pub fn sections(&self) -> &[TypeSection] {
        &self.sections
    }

    pub fn physical_records(&self) -> &[PhysicalRecord] {
        &self.physical
    }

    pub fn logical_records(&self) -> &[LogicalRecord] {
        &self.logical
    }

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Loaded state of the section at `index`
    pub fn section_data(&self, index: usize) -> Option<&SectionData> {
        self.buffers.get(index)
    }

    /// Unsanitized name of a logical resource
    pub fn raw_name(&self, index: usize) -> Option<Cow<'_, str>> {
        self.names.name(index)
    }

    /// Describe the logical resource at `index`.
    pub fn entry(&self, index: usize) -> Option<ResourceEntry> {
        let record = self.logical.get(index)?;
        let name = self.names.name(index).unwrap_or_default();

        Some(ResourceEntry {
            index,
            name: sanitize_file_name(&name),
            file_type: record.file_type(),
            type_name: display_name(record.file_type()),
            first_resource: record.first_resource as usize,
            part_count: record.part_count(),
        })
    }

    /// Returns an iterator over the descriptions of all logical resources.
    pub fn resources(&self) -> impl Iterator<Item = ResourceEntry> + '_ {
        (0..self.len()).filter_map(|i| self.entry(i))
    }

    /// Unwrap and return the inner reader object
    ///
    /// The position of the reader is undefined.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read + Seek> RpackArchive<R> {
    /// Read an rpack archive, parsing its tables and decompressing its sections.
    ///
    /// Any problem with the header or the tables is fatal, problems with single sections are
    /// logged and only make the affected resources unavailable.
    #[instrument(skip_all, err)]
    pub fn new(mut reader: R) -> Result<RpackArchive<R>> {
        let file_len = reader.seek(io::SeekFrom::End(0))?;
        reader.rewind()?;

        let header = ArchiveHeader::read(&mut reader)?;
        let available = file_len.saturating_sub(ArchiveHeader::SIZE);
        let required = header.tables_size();
        if required > available {
            return Err(Error::TruncatedTables {
                required,
                available,
            });
        }

        let sections = Self::read_table(&mut reader, header.phys_res_type_count)?;
        let physical = Self::read_table(&mut reader, header.phys_res_count)?;
        let logical = Self::read_table(&mut reader, header.resource_names_count)?;
        let names = Self::read_names(&mut reader, &header)?;

        debug!(
            sections = sections.len(),
            physical = physical.len(),
            logical = logical.len(),
            "read archive tables"
        );

        let buffers = SectionBuffers::load(&mut reader, file_len, &sections);

        Ok(RpackArchive {
            reader,
            file_len,
            header,
            sections,
            physical,
            logical,
            names,
            buffers,
        })
    }

    fn read_table<T>(reader: &mut R, count: u32) -> Result<Vec<T>>
    where
        T: for<'a> BinRead<Args<'a> = ()>,
    {
        (0..count)
            .map(|_| T::read_le(reader).map_err(Error::from))
            .collect()
    }

    fn read_names(reader: &mut R, header: &ArchiveHeader) -> Result<NameTable> {
        let offsets = (0..header.resource_names_count)
            .map(|_| reader.read_u32::<LittleEndian>().map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;

        let mut blob = vec![0u8; header.resource_names_block_size as usize];
        reader.read_exact(&mut blob)?;

        Ok(NameTable::new(offsets, blob))
    }

    /// Load the parts of the logical resource at `index`.
    ///
    /// A part that cannot be read is logged and ends assembly, keeping the parts read before
    /// it. The returned resource may therefore have fewer parts than declared, or none.
    #[instrument(skip(self))]
    pub fn assemble(
        &mut self,
        index: usize,
        compressed: CompressedSections,
    ) -> Result<AssembledResource> {
        let entry = self.entry(index).ok_or(Error::ResourceNotFound(index))?;

        let mut parts = Vec::with_capacity(entry.part_count);
        for (part, record) in (entry.first_resource..)
            .take(entry.part_count)
            .enumerate()
        {
            match self.read_part(record, compressed) {
                Ok(Some(data)) => {
                    trace!(part, record, size = data.len(), "read part");
                    parts.push(data);
                }
                Ok(None) => {
                    debug!(part, record, "skipping part stored in a compressed section");
                }
                Err(e) => {
                    warn!(
                        resource = index,
                        name = %entry.name,
                        part,
                        record,
                        error = %e,
                        "unable to read part, abandoning the rest of the resource"
                    );
                    break;
                }
            }
        }

        Ok(AssembledResource {
            index,
            base_name: entry.name,
            type_name: entry.type_name,
            file_type: entry.file_type,
            parts,
        })
    }

    fn read_part(
        &mut self,
        record_index: usize,
        compressed: CompressedSections,
    ) -> Result<Option<Vec<u8>>> {
        let record = *self
            .physical
            .get(record_index)
            .ok_or(Error::PhysicalRecordOutOfRange(record_index))?;
        let section_index = record.section_index();
        let section = *self
            .sections
            .get(section_index)
            .ok_or(Error::InvalidSection(section_index))?;

        if section.is_compressed() && compressed == CompressedSections::Skip {
            return Ok(None);
        }

        let size = record.data_byte_size as u64;
        match self.buffers.get(section_index) {
            Some(SectionData::Raw) => {
                let offset = absolute_offset(
                    section.data_file_offset as u64,
                    record.data_offset as u64,
                )
                .ok_or(Error::OffsetOverflow {
                    units: section.data_file_offset as u64 + record.data_offset as u64,
                })?;
                read_range(&mut self.reader, self.file_len, offset, size).map(Some)
            }
            Some(SectionData::Decompressed(data)) => {
                let offset =
                    units_to_bytes(record.data_offset as u64).ok_or(Error::OffsetOverflow {
                        units: record.data_offset as u64,
                    })?;
                slice_range(data, offset, size).map(|bytes| Some(bytes.to_vec()))
            }
            _ => Err(Error::SectionUnavailable(section_index)),
        }
    }
}

fn read_range<R: Read + Seek>(
    reader: &mut R,
    len: u64,
    offset: u64,
    size: u64,
) -> Result<Vec<u8>> {
    offset
        .checked_add(size)
        .filter(|end| *end <= len)
        .ok_or(Error::OutOfBounds { offset, size, len })?;

    reader.seek(io::SeekFrom::Start(offset))?;
    let mut data = vec![0u8; size as usize];
    reader.read_exact(&mut data)?;
    Ok(data)
}

fn slice_range(data: &[u8], offset: u64, size: u64) -> Result<&[u8]> {
    let out_of_bounds = || Error::OutOfBounds {
        offset,
        size,
        len: data.len() as u64,
    };

    let start = usize::try_from(offset).map_err(|_| out_of_bounds())?;
    let end = start
        .checked_add(usize::try_from(size).map_err(|_| out_of_bounds())?)
        .ok_or_else(out_of_bounds)?;
    data.get(start..end).ok_or_else(out_of_bounds)
}

//! Base types for structure of an rpack file.

use binrw::{BinRead, BinWrite};

/// Granularity of every offset stored in the archive tables.
pub const UNIT_SIZE: u64 = 16;

/// Convert a count of 16-byte units into a byte offset.
///
/// Returns `None` instead of wrapping when the result does not fit into a signed 64-bit file
/// position.
pub fn units_to_bytes(units: u64) -> Option<u64> {
    units
        .checked_mul(UNIT_SIZE)
        .filter(|bytes| *bytes <= i64::MAX as u64)
}

/// Byte offset of `part_units` inside a section starting at `section_units`.
pub fn absolute_offset(section_units: u64, part_units: u64) -> Option<u64> {
    units_to_bytes(section_units)?
        .checked_add(units_to_bytes(part_units)?)
        .filter(|bytes| *bytes <= i64::MAX as u64)
}

/// rpack file header
///
/// Sits at the very start of the file and declares the size of every table that follows it.
/// All data is stored in little endian format.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct ArchiveHeader {
    /// Four identifying bytes, recorded but never validated
    pub magic: [u8; 4],

    pub version: u32,

    pub flags: u32,

    /// The number of [`PhysicalRecord`]s in the file
    pub phys_res_count: u32,

    /// The number of [`TypeSection`]s in the file
    pub phys_res_type_count: u32,

    /// The number of [`LogicalRecord`]s, which is also the number of name offsets
    pub resource_names_count: u32,

    /// The size in bytes of the NUL separated name blob
    pub resource_names_block_size: u32,

    pub log_res_count: u32,

    pub sector_alignment: u32,
}

impl ArchiveHeader {
    /// Size of the header on disk
    pub const SIZE: u64 = 36;

    /// Number of bytes the tables following the header occupy.
    pub fn tables_size(&self) -> u64 {
        self.phys_res_type_count as u64 * TypeSection::SIZE
            + self.phys_res_count as u64 * PhysicalRecord::SIZE
            + self.resource_names_count as u64 * (LogicalRecord::SIZE + 4)
            + self.resource_names_block_size as u64
    }
}

/// A type section
///
/// Describes one extent of the archive which backs a number of physical records. When
/// `compressed_byte_size` is zero the section is stored as is, otherwise it holds a compressed
/// blob that expands into `data_byte_size` bytes.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct TypeSection {
    pub bitfields: u32,

    /// Start of the section from the beginning of the file, in 16-byte units
    pub data_file_offset: u32,

    /// The size of the section once decompressed
    pub data_byte_size: u32,

    /// The size of the section inside the file, zero when uncompressed
    pub compressed_byte_size: u32,

    pub resource_count: u32,
}

impl TypeSection {
    /// Size of a section descriptor on disk
    pub const SIZE: u64 = 20;

    /// Whether the section is stored as a compressed blob
    pub fn is_compressed(&self) -> bool {
        self.compressed_byte_size > 0
    }

    /// Absolute byte offset of the section, if representable
    pub fn byte_offset(&self) -> Option<u64> {
        units_to_bytes(self.data_file_offset as u64)
    }
}

/// A physical record
///
/// One byte range inside a single type section. The low byte of `bitfields` selects the
/// owning section.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct PhysicalRecord {
    pub bitfields: u32,

    /// Offset relative to the owning section, in 16-byte units
    pub data_offset: u32,

    /// The size of this part in bytes
    pub data_byte_size: u32,

    #[allow(dead_code)]
    pub compressed_byte_size: i16,

    #[allow(dead_code)]
    pub referenced_resource: i16,
}

impl PhysicalRecord {
    /// Size of a physical record on disk
    pub const SIZE: u64 = 16;

    /// Index of the [`TypeSection`] holding this record's bytes
    pub fn section_index(&self) -> usize {
        (self.bitfields & 0xFF) as usize
    }
}

/// A logical record
///
/// The externally visible resource, made of `part_count` consecutive physical records starting
/// at `first_resource`.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct LogicalRecord {
    pub bitfields: u32,

    pub first_name_index: u32,

    /// Index of the first [`PhysicalRecord`] of this resource
    pub first_resource: u32,
}

impl LogicalRecord {
    /// Size of a logical record on disk
    pub const SIZE: u64 = 12;

    /// Numeric resource type, see [`crate::resource_type::ResourceType`]
    pub fn file_type(&self) -> u8 {
        ((self.bitfields >> 16) & 0xFF) as u8
    }

    /// Number of physical records making up this resource
    pub fn part_count(&self) -> usize {
        (self.bitfields & 0xFF) as usize
    }

    /// Pack a type code and part count the way the archive stores them.
    pub fn pack_bitfields(file_type: u8, part_count: u8) -> u32 {
        ((file_type as u32) << 16) | part_count as u32
    }
}

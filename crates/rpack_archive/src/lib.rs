//! This library handles reading and extracting **rpack** resource packages.
//!
//! # rpack Archive Format Documentation
//!
//! An rpack file bundles the assets of a game level (textures, animations, meshes, sounds,
//! ...) into a single file. Assets are split into *physical records*, byte ranges grouped into
//! *type sections* that may be compressed as a whole. *Logical records* stitch runs of
//! physical records back together into the resources a user would recognise.
//!
//! ## File Structure
//!
//! The file starts with a header, immediately followed by the tables and the name block. The
//! section data follows at offsets given in units of 16 bytes.
//!
//! | Offset (bytes) | Field                     | Description                                        |
//! |----------------|---------------------------|----------------------------------------------------|
//! | 0x0000         | Magic number              | 4 bytes, recorded but not validated                |
//! | 0x0004         | Version                   | 4 bytes                                            |
//! | 0x0008         | Flags                     | 4 bytes                                            |
//! | 0x000C         | Physical Record Count     | 4 bytes: Number of physical records                |
//! | 0x0010         | Type Section Count        | 4 bytes: Number of type sections                   |
//! | 0x0014         | Resource Name Count       | 4 bytes: Number of logical records and names       |
//! | 0x0018         | Name Block Size           | 4 bytes: Size of the name block in bytes           |
//! | 0x001C         | Logical Resource Count    | 4 bytes, informational                             |
//! | 0x0020         | Sector Alignment          | 4 bytes, informational                             |
//!
//! The tables follow in this order:
//!
//! - **Type sections** (20 bytes each): bitfields, data offset (16 byte units), uncompressed
//!   size, compressed size (`0` when stored uncompressed) and resource count.
//! - **Physical records** (16 bytes each): bitfields whose low 8 bits select the owning type
//!   section, data offset relative to the section (16 byte units), size in bytes and two
//!   legacy 16 bit fields.
//! - **Logical records** (12 bytes each): bitfields holding the resource type in bits 16..24
//!   and the part count in bits 0..8, the first name index and the index of the first
//!   physical record. The parts of a resource are the `part count` physical records starting
//!   there.
//! - **Name offsets** (4 bytes each), one per logical record.
//! - **Name block**: NUL terminated names.
//!
//! ### Compression
//!
//! A compressed section is a single zlib stream when its first byte is `0x78`, otherwise a
//! raw LZMA stream using the default properties. Physical records of a compressed section
//! point into the decompressed data.
//!
//! ### Textures
//!
//! Texture resources consist of an 80 byte header describing dimensions, pixel format, kind
//! and mip count, followed by a part holding the pixel data. [`dds`] turns both into a DDS
//! file.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.rpack`
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod compression;
pub mod dds;
pub mod error;
pub mod extract;
pub mod names;
pub mod read;
pub mod resource_type;
pub mod texture;
pub mod types;
pub mod write;

pub use extract::{ExtractOptions, ExtractSummary};
pub use read::{CompressedSections, RpackArchive};
pub use resource_type::ResourceType;
pub use write::ResourceWriter;

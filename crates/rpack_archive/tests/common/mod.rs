#![allow(dead_code)]

use binrw::BinWrite;
use flate2::{write::ZlibEncoder, Compression};
use rpack_archive::types::{
    ArchiveHeader, LogicalRecord, PhysicalRecord, TypeSection, UNIT_SIZE,
};
use std::io::{Cursor, Write};

/// How a section is stored in a generated archive
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Storage {
    Raw,
    Zlib,
    Lzma,
}

struct Section {
    storage: Storage,
    payload: Vec<u8>,
    resource_count: u32,
}

struct Resource {
    name: Vec<u8>,
    file_type: u8,
    first_resource: u32,
    part_count: u8,
}

/// Generates rpack archives in memory
#[derive(Default)]
pub struct ArchiveBuilder {
    sections: Vec<Section>,
    physical: Vec<PhysicalRecord>,
    resources: Vec<Resource>,
}

fn pad(data: &mut Vec<u8>) {
    let padded = data.len().next_multiple_of(UNIT_SIZE as usize);
    data.resize(padded, 0);
}

fn compress(storage: Storage, data: &[u8]) -> Vec<u8> {
    match storage {
        Storage::Raw => data.to_vec(),
        Storage::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        Storage::Lzma => {
            let mut output = Vec::new();
            lzma_rs::lzma_compress(&mut &data[..], &mut output).unwrap();
            // the archive stores the stream without the .lzma header
            output.split_off(13)
        }
    }
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section, returning its index.
    pub fn section(&mut self, storage: Storage) -> usize {
        self.sections.push(Section {
            storage,
            payload: Vec::new(),
            resource_count: 0,
        });
        self.sections.len() - 1
    }

    /// Append a physical record holding `data` to `section`, returning the record index.
    pub fn part(&mut self, section: usize, data: &[u8]) -> u32 {
        let target = &mut self.sections[section];
        let data_offset = (target.payload.len() / UNIT_SIZE as usize) as u32;
        target.payload.extend_from_slice(data);
        pad(&mut target.payload);
        target.resource_count += 1;

        self.physical.push(PhysicalRecord {
            bitfields: section as u32,
            data_offset,
            data_byte_size: data.len() as u32,
            ..Default::default()
        });
        (self.physical.len() - 1) as u32
    }

    /// Append a physical record owned by `section_index` without storing any data for it.
    pub fn dangling_part(&mut self, section_index: u32, data_byte_size: u32) -> u32 {
        self.physical.push(PhysicalRecord {
            bitfields: section_index,
            data_byte_size,
            ..Default::default()
        });
        (self.physical.len() - 1) as u32
    }

    /// Declare a logical resource made of `part_count` records starting at `first_resource`.
    pub fn resource(
        &mut self,
        name: &str,
        file_type: u8,
        first_resource: u32,
        part_count: u8,
    ) -> &mut Self {
        self.resources.push(Resource {
            name: name.as_bytes().to_vec(),
            file_type,
            first_resource,
            part_count,
        });
        self
    }

    /// Add a resource whose parts are stored consecutively in `section`.
    pub fn resource_with_parts(
        &mut self,
        name: &str,
        file_type: u8,
        section: usize,
        parts: &[&[u8]],
    ) -> &mut Self {
        let first = self.physical.len() as u32;
        for part in parts {
            self.part(section, part);
        }
        self.resource(name, file_type, first, parts.len() as u8)
    }

    pub fn build(&self) -> Vec<u8> {
        let mut blob = Vec::new();
        let mut name_offsets = Vec::new();
        for resource in &self.resources {
            name_offsets.push(blob.len() as u32);
            blob.extend_from_slice(&resource.name);
            blob.push(0);
        }

        let header = ArchiveHeader {
            magic: *b"RP6L",
            version: 4,
            flags: 0,
            phys_res_count: self.physical.len() as u32,
            phys_res_type_count: self.sections.len() as u32,
            resource_names_count: self.resources.len() as u32,
            resource_names_block_size: blob.len() as u32,
            log_res_count: self.resources.len() as u32,
            sector_alignment: UNIT_SIZE as u32,
        };

        let stored = self
            .sections
            .iter()
            .map(|section| compress(section.storage, &section.payload))
            .collect::<Vec<_>>();

        let mut data_start = ArchiveHeader::SIZE + header.tables_size();
        data_start = data_start.next_multiple_of(UNIT_SIZE);

        let mut output = Cursor::new(Vec::new());
        header.write(&mut output).unwrap();

        let mut offset = data_start;
        for (section, bytes) in self.sections.iter().zip(&stored) {
            let compressed = section.storage != Storage::Raw;
            TypeSection {
                bitfields: 0,
                data_file_offset: (offset / UNIT_SIZE) as u32,
                data_byte_size: section.payload.len() as u32,
                compressed_byte_size: if compressed { bytes.len() as u32 } else { 0 },
                resource_count: section.resource_count,
            }
            .write(&mut output)
            .unwrap();
            offset = (offset + bytes.len() as u64).next_multiple_of(UNIT_SIZE);
        }

        for record in &self.physical {
            record.write(&mut output).unwrap();
        }

        for resource in &self.resources {
            LogicalRecord {
                bitfields: LogicalRecord::pack_bitfields(resource.file_type, resource.part_count),
                first_name_index: 0,
                first_resource: resource.first_resource,
            }
            .write(&mut output)
            .unwrap();
        }

        for offset in name_offsets {
            output.write_all(&offset.to_le_bytes()).unwrap();
        }
        output.write_all(&blob).unwrap();

        let mut output = output.into_inner();
        output.resize(data_start as usize, 0);
        for bytes in stored {
            output.extend_from_slice(&bytes);
            pad(&mut output);
        }

        output
    }
}

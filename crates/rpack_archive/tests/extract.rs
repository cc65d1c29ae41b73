mod common;

use common::{ArchiveBuilder, Storage};
use pretty_assertions::assert_eq;
use rpack_archive::{
    compression::SectionData,
    error::Error,
    read::CompressedSections,
    texture::{PixelFormat, TextureHeader, TextureKind},
    ExtractOptions, RpackArchive,
};
use std::{
    io::Cursor,
    path::{Path, PathBuf},
};
use tracing_test::traced_test;
use walkdir::WalkDir;

const TEXTURE: u8 = 32;
const ANIMATION: u8 = 64;
const MESH: u8 = 16;
const BUILDER_INFORMATION: u8 = 255;

/// Relative paths of every file below `root`, sorted
fn tree(root: &Path) -> Vec<PathBuf> {
    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect::<Vec<_>>();
    files.sort();
    files
}

fn extract(archive: Vec<u8>, options: ExtractOptions) -> (tempfile::TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().unwrap();
    let mut rpack = RpackArchive::new(Cursor::new(archive)).unwrap();
    rpack.extract(dir.path(), options).unwrap();
    let files = tree(dir.path());
    (dir, files)
}

fn texture_header(width: u16, height: u16, format: PixelFormat) -> Vec<u8> {
    use binrw::BinWrite;

    let header = TextureHeader {
        magic: *b"IMGC",
        header_size: TextureHeader::SIZE as u32,
        width,
        height,
        depth: 1,
        format,
        kind_and_mips: TextureHeader::pack_kind_and_mips(TextureKind::Plain, 1),
        ..Default::default()
    };
    let mut output = Cursor::new(Vec::new());
    header.write(&mut output).unwrap();
    output.into_inner()
}

#[traced_test]
#[test]
fn extract_builder_information() {
    let mut builder = ArchiveBuilder::new();
    let raw = builder.section(Storage::Raw);
    builder.resource_with_parts(
        "level_info",
        BUILDER_INFORMATION,
        raw,
        &[b"built by nobody", b"second part"],
    );

    let (dir, files) = extract(builder.build(), ExtractOptions::default());
    assert_eq!(
        files,
        vec![
            PathBuf::from("BuilderInformation/level_info.txt"),
            PathBuf::from("BuilderInformation/level_info_Part_1.txt"),
        ]
    );
    assert_eq!(
        std::fs::read(dir.path().join("BuilderInformation/level_info.txt")).unwrap(),
        b"built by nobody"
    );
}

#[test]
fn resources_without_parts_produce_nothing() {
    let mut builder = ArchiveBuilder::new();
    let raw = builder.section(Storage::Raw);
    builder.part(raw, b"unused");
    builder.resource("empty", MESH, 0, 0);

    let dir = tempfile::tempdir().unwrap();
    let mut rpack = RpackArchive::new(Cursor::new(builder.build())).unwrap();
    let summary = rpack.extract(dir.path(), ExtractOptions::default()).unwrap();

    assert_eq!(summary.resources, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.extracted, 0);
    assert!(tree(dir.path()).is_empty());
}

#[traced_test]
#[test]
fn out_of_range_parts_are_truncated() {
    let mut builder = ArchiveBuilder::new();
    let raw = builder.section(Storage::Raw);
    builder.part(raw, b"first");
    builder.part(raw, b"second");
    // declares three parts starting at the second record, only one exists
    builder.resource("spill", MESH, 1, 3);
    builder.resource("after", MESH, 0, 1);

    let (dir, files) = extract(builder.build(), ExtractOptions::default());
    assert_eq!(
        files,
        vec![
            PathBuf::from("Mesh/0000_spill_part00.bin"),
            PathBuf::from("Mesh/0001_after_part00.bin"),
        ]
    );
    assert_eq!(
        std::fs::read(dir.path().join("Mesh/0000_spill_part00.bin")).unwrap(),
        b"second"
    );
    assert!(logs_contain("unable to read part, abandoning the rest of the resource"));
}

#[traced_test]
#[test]
fn parts_of_missing_sections_are_truncated() {
    let mut builder = ArchiveBuilder::new();
    let raw = builder.section(Storage::Raw);
    let first = builder.part(raw, b"kept");
    builder.dangling_part(9, 4);
    builder.resource("torn", MESH, first, 2);
    builder.resource_with_parts("next", MESH, raw, &[b"untouched"]);

    let (dir, files) = extract(builder.build(), ExtractOptions::default());
    assert_eq!(
        files,
        vec![
            PathBuf::from("Mesh/0000_torn_part00.bin"),
            PathBuf::from("Mesh/0001_next_part00.bin"),
        ]
    );
    assert_eq!(
        std::fs::read(dir.path().join("Mesh/0000_torn_part00.bin")).unwrap(),
        b"kept"
    );
    assert_eq!(
        std::fs::read(dir.path().join("Mesh/0001_next_part00.bin")).unwrap(),
        b"untouched"
    );
    assert!(logs_contain("section 9 does not exist"));
}

#[test]
fn extract_texture_as_dds() {
    let pixels = vec![0x5Au8; 2 * 2 * 8];

    let mut builder = ArchiveBuilder::new();
    let raw = builder.section(Storage::Raw);
    builder.resource_with_parts(
        "rock",
        TEXTURE,
        raw,
        &[&texture_header(8, 8, PixelFormat::BC1_UNORM), &pixels],
    );

    let (dir, files) = extract(builder.build(), ExtractOptions::default());
    assert_eq!(files, vec![PathBuf::from("Texture/rock.dds")]);

    let dds = std::fs::read(dir.path().join("Texture/rock.dds")).unwrap();
    assert_eq!(&dds[..4], b"DDS ");
    assert_eq!(u32::from_le_bytes(dds[12..16].try_into().unwrap()), 8);
    assert_eq!(u32::from_le_bytes(dds[16..20].try_into().unwrap()), 8);
    // linear size of 2x2 blocks of 8 bytes
    assert_eq!(u32::from_le_bytes(dds[20..24].try_into().unwrap()), 32);
    assert_eq!(&dds[84..88], b"DX10");
    assert_eq!(&dds[148..], &pixels[..]);
}

#[test]
fn extract_legacy_texture_without_extension() {
    let pixels = vec![0x11u8; 4 * 4 * 2];

    let mut builder = ArchiveBuilder::new();
    let raw = builder.section(Storage::Raw);
    builder.resource_with_parts(
        "sky",
        TEXTURE,
        raw,
        &[&texture_header(4, 4, PixelFormat::R5G6B5), &pixels],
    );

    let (dir, _) = extract(builder.build(), ExtractOptions::default());
    let dds = std::fs::read(dir.path().join("Texture/sky.dds")).unwrap();
    assert_eq!(dds.len(), 128 + pixels.len());
    // row pitch of 4 pixels of 2 bytes
    assert_eq!(u32::from_le_bytes(dds[20..24].try_into().unwrap()), 8);
}

#[traced_test]
#[test]
fn texture_with_bad_header_falls_back_to_binary() {
    let mut builder = ArchiveBuilder::new();
    let raw = builder.section(Storage::Raw);
    builder.resource_with_parts("broken", TEXTURE, raw, &[b"tiny", b"pixels"]);

    let (_dir, files) = extract(builder.build(), ExtractOptions::default());
    assert_eq!(
        files,
        vec![
            PathBuf::from("Texture/0000_broken_part00.bin"),
            PathBuf::from("Texture/0000_broken_part01.bin"),
        ]
    );
    assert!(logs_contain("falling back to a binary dump"));
}

#[test]
fn read_parts_from_compressed_sections() {
    for storage in [Storage::Zlib, Storage::Lzma] {
        let mut builder = ArchiveBuilder::new();
        let packed = builder.section(storage);
        builder.resource_with_parts("walk", ANIMATION, packed, &[b"animation data"]);
        builder.resource_with_parts("misc", MESH, packed, &[b"aaaa", b"bbbbbbbbbbbbbbbbbbbb"]);

        let mut rpack = RpackArchive::new(Cursor::new(builder.build())).unwrap();
        assert!(matches!(
            rpack.section_data(0),
            Some(SectionData::Decompressed(_))
        ));

        let misc = rpack.assemble(1, CompressedSections::Decompress).unwrap();
        assert_eq!(
            misc.parts,
            vec![b"aaaa".to_vec(), b"bbbbbbbbbbbbbbbbbbbb".to_vec()],
            "{storage:?}"
        );

        let dir = tempfile::tempdir().unwrap();
        rpack.extract(dir.path(), ExtractOptions::default()).unwrap();
        assert_eq!(
            std::fs::read(dir.path().join("Animation/walk.anm2")).unwrap(),
            b"animation data",
            "{storage:?}"
        );
    }
}

#[test]
fn skip_parts_of_compressed_sections() {
    let mut builder = ArchiveBuilder::new();
    let raw = builder.section(Storage::Raw);
    let packed = builder.section(Storage::Zlib);
    let first = builder.part(raw, b"raw one");
    builder.part(packed, b"packed");
    builder.part(raw, b"raw two");
    builder.resource("mixed", MESH, first, 3);
    builder.resource_with_parts("hidden", MESH, packed, &[b"only packed"]);

    let options = ExtractOptions::builder()
        .compressed_sections(CompressedSections::Skip)
        .build();

    let dir = tempfile::tempdir().unwrap();
    let mut rpack = RpackArchive::new(Cursor::new(builder.build())).unwrap();
    let summary = rpack.extract(dir.path(), options).unwrap();

    assert_eq!(
        tree(dir.path()),
        vec![
            PathBuf::from("Mesh/0000_mixed_part00.bin"),
            PathBuf::from("Mesh/0000_mixed_part01.bin"),
        ]
    );
    assert_eq!(
        std::fs::read(dir.path().join("Mesh/0000_mixed_part01.bin")).unwrap(),
        b"raw two"
    );
    assert_eq!(summary.extracted, 1);
    assert_eq!(summary.skipped, 1);
}

#[traced_test]
#[test]
fn corrupt_section_only_affects_its_resources() {
    let mut builder = ArchiveBuilder::new();
    let raw = builder.section(Storage::Raw);
    let packed = builder.section(Storage::Zlib);
    builder.resource_with_parts("good", MESH, raw, &[b"fine"]);
    builder.resource_with_parts("bad", MESH, packed, &[b"lost data"]);

    let mut archive = builder.build();
    let section = RpackArchive::new(Cursor::new(archive.clone()))
        .unwrap()
        .sections()[packed];
    let start = section.byte_offset().unwrap() as usize;
    let end = start + section.compressed_byte_size as usize;
    // keep the zlib header, break the first deflate block
    archive[start + 2..end].fill(0xFF);

    let (_dir, files) = extract(archive, ExtractOptions::default());
    assert_eq!(files, vec![PathBuf::from("Mesh/0000_good_part00.bin")]);
    assert!(logs_contain("unable to decompress section"));
}

#[test]
fn extracting_twice_never_overwrites() {
    let mut builder = ArchiveBuilder::new();
    let raw = builder.section(Storage::Raw);
    builder.resource_with_parts("dup", MESH, raw, &[b"data"]);
    let archive = builder.build();

    let dir = tempfile::tempdir().unwrap();
    for _ in 0..2 {
        let mut rpack = RpackArchive::new(Cursor::new(archive.clone())).unwrap();
        rpack.extract(dir.path(), ExtractOptions::default()).unwrap();
    }

    assert_eq!(
        tree(dir.path()),
        vec![
            PathBuf::from("Mesh/0000_dup_part00.bin"),
            PathBuf::from("Mesh/0000_dup_part00_1.bin"),
        ]
    );
}

#[test]
fn names_are_sanitized_and_unknown_types_kept() {
    let mut builder = ArchiveBuilder::new();
    let raw = builder.section(Storage::Raw);
    builder.resource_with_parts("a/b:c", 7, raw, &[b"x"]);
    builder.resource_with_parts("", MESH, raw, &[b"y"]);

    let (_dir, files) = extract(builder.build(), ExtractOptions::default());
    assert_eq!(
        files,
        vec![
            PathBuf::from("Invalid/0000_a_b_c_part00.bin"),
            PathBuf::from("Mesh/0001_unnamed_part00.bin"),
        ]
    );
}

#[test]
fn list_resources() {
    let mut builder = ArchiveBuilder::new();
    let raw = builder.section(Storage::Raw);
    builder.resource_with_parts("one", TEXTURE, raw, &[b"h", b"p"]);
    builder.resource_with_parts("two", ANIMATION, raw, &[b"a"]);

    let rpack = RpackArchive::new(Cursor::new(builder.build())).unwrap();
    let entries = rpack.resources().collect::<Vec<_>>();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "one");
    assert_eq!(entries[0].type_name, "Texture");
    assert_eq!(entries[0].part_count, 2);
    assert_eq!(entries[1].first_resource, 2);
    assert_eq!(entries[1].type_name, "Animation");
}

#[test]
fn truncated_tables_are_fatal() {
    let mut builder = ArchiveBuilder::new();
    let raw = builder.section(Storage::Raw);
    builder.resource_with_parts("one", MESH, raw, &[b"data"]);
    let mut archive = builder.build();
    archive.truncate(40);

    let result = RpackArchive::new(Cursor::new(archive));
    assert!(matches!(result, Err(Error::TruncatedTables { .. })));
}

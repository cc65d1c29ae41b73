//! Writers turning assembled resources into files
//!

use binrw::BinRead;
use std::{
    fs::{self, File},
    io::{self, Cursor, Write},
    path::{Path, PathBuf},
};
use tracing::{info, instrument, warn};

use crate::{
    dds::build_dds,
    error::{Error, Result},
    names::create_unique,
    read::AssembledResource,
    resource_type::ResourceType,
    texture::TextureHeader,
};

/// The closed set of output formats a resource can be written as
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResourceWriter {
    /// Header part plus pixel part, written as a `.dds` file
    Texture,

    /// First part written as an `.anm2` file
    Animation,

    /// Every part written as a text file
    BuilderInformation,

    /// Every part written as a numbered `.bin` file
    Binary,
}

impl ResourceWriter {
    /// Pick the writer for a resource type code, [`ResourceWriter::Binary`] for anything
    /// without a dedicated writer.
    pub fn for_type(code: u8) -> ResourceWriter {
        match ResourceType::from_code(code) {
            Some(ResourceType::Texture) => ResourceWriter::Texture,
            Some(ResourceType::Animation) => ResourceWriter::Animation,
            Some(ResourceType::BuilderInformation) => ResourceWriter::BuilderInformation,
            _ => ResourceWriter::Binary,
        }
    }

    /// Write `resource` into `dir`, returning the paths of the files created.
    ///
    /// Existing files are never overwritten, a taken name gets a numeric suffix instead.
    pub fn write(self, resource: &AssembledResource, dir: &Path) -> Result<Vec<PathBuf>> {
        match self {
            ResourceWriter::Texture => write_texture(resource, dir),
            ResourceWriter::Animation => write_animation(resource, dir),
            ResourceWriter::BuilderInformation => write_builder_information(resource, dir),
            ResourceWriter::Binary => write_binary(resource, dir),
        }
    }
}

/// Write `resource` with the writer for its type.
///
/// When a dedicated writer fails the resource is dumped with [`ResourceWriter::Binary`]
/// instead. Files the failed writer already produced are kept.
#[instrument(skip_all, fields(index = resource.index, name = %resource.base_name))]
pub fn write_resource(resource: &AssembledResource, dir: &Path) -> Result<Vec<PathBuf>> {
    let writer = ResourceWriter::for_type(resource.file_type);

    match writer.write(resource, dir) {
        Ok(files) => Ok(files),
        Err(e) if writer != ResourceWriter::Binary => {
            warn!(
                ?writer,
                type_name = resource.type_name,
                error = %e,
                "unable to write resource, falling back to a binary dump"
            );
            ResourceWriter::Binary.write(resource, dir)
        }
        Err(e) => Err(e),
    }
}

fn write_file(path: &Path, data: &[u8]) -> Result<PathBuf> {
    let path = write_new_file(path, |file| file.write_all(data))?;
    info!(path = %path.display(), size = data.len(), "wrote file");
    Ok(path)
}

/// Create a unique file next to `path` and fill it, removing it again if filling fails.
fn write_new_file<F>(path: &Path, fill: F) -> Result<PathBuf>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let (path, mut file) = create_unique(path)?;
    if let Err(e) = fill(&mut file) {
        drop(file);
        if let Err(remove) = fs::remove_file(&path) {
            warn!(path = %path.display(), error = %remove, "unable to remove incomplete file");
        }
        return Err(e.into());
    }
    Ok(path)
}

fn write_texture(resource: &AssembledResource, dir: &Path) -> Result<Vec<PathBuf>> {
    let [header, pixels, ..] = resource.parts.as_slice() else {
        warn!(
            error = %Error::NotEnoughParts {
                required: 2,
                actual: resource.parts.len(),
            },
            "texture is missing its header or pixel data"
        );
        return Ok(Vec::new());
    };

    let texture = TextureHeader::read(&mut Cursor::new(header))?;
    let dds = match build_dds(&texture, pixels) {
        Ok(dds) => dds,
        Err(e @ Error::MissingDxgiFormat(_)) => {
            warn!(error = %e, "texture format cannot be described, skipping");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let path = write_file(&dir.join(format!("{}.dds", resource.base_name)), &dds)?;
    Ok(vec![path])
}

fn write_animation(resource: &AssembledResource, dir: &Path) -> Result<Vec<PathBuf>> {
    let Some(first) = resource.parts.first() else {
        return Ok(Vec::new());
    };
    if resource.parts.len() > 1 {
        warn!(
            parts = resource.parts.len(),
            "animation has unexpected extra parts, only the first one is written"
        );
    }

    let path = write_file(&dir.join(format!("{}.anm2", resource.base_name)), first)?;
    Ok(vec![path])
}

fn write_builder_information(resource: &AssembledResource, dir: &Path) -> Result<Vec<PathBuf>> {
    resource
        .parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let name = match i {
                0 => format!("{}.txt", resource.base_name),
                i => format!("{}_Part_{i}.txt", resource.base_name),
            };
            write_file(&dir.join(name), part)
        })
        .collect()
}

fn write_binary(resource: &AssembledResource, dir: &Path) -> Result<Vec<PathBuf>> {
    resource
        .parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let name = format!(
                "{:04}_{}_part{i:02}.bin",
                resource.index, resource.base_name
            );
            write_file(&dir.join(name), part)
        })
        .collect()
}

use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use rpack_archive::{CompressedSections, ExtractOptions, RpackArchive};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::info;

#[derive(Args)]
pub struct ExtractArgs {
    /// An input rpack file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory, defaults to the input path without its extension
    /// (or with `_extracted` appended when it has none)
    #[arg(short, long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Leave out parts stored in compressed sections
    #[arg(long, default_value_t = false)]
    skip_compressed: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let mut rpack = RpackArchive::new(BufReader::new(f))
            .context(format!("reading {}", &self.file.display()))?;

        let directory = self
            .directory
            .clone()
            .unwrap_or_else(|| default_directory(&self.file));
        info!("extracting {} resources into {}", rpack.len(), directory.display());

        let options = ExtractOptions::builder()
            .compressed_sections(if self.skip_compressed {
                CompressedSections::Skip
            } else {
                CompressedSections::Decompress
            })
            .build();

        let summary = rpack
            .extract(&directory, options)
            .context(format!("extracting into {}", directory.display()))?;

        println!(
            "{} extracted, {} skipped, {} failed, {} files written",
            summary.extracted.green(),
            summary.skipped.yellow(),
            summary.failed.red(),
            summary.files.len()
        );

        Ok(())
    }
}

/// Sibling of `file` named after its stem, never `file` itself
fn default_directory(file: &Path) -> PathBuf {
    match (file.extension(), file.file_stem()) {
        (Some(_), Some(stem)) => file.with_file_name(stem),
        _ => {
            let mut name = file.file_name().unwrap_or_default().to_os_string();
            name.push("_extracted");
            file.with_file_name(name)
        }
    }
}

use clap::Args;
use itertools::Itertools;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use rpack_archive::{compression::SectionData, RpackArchive};
use std::{fs::File, io::BufReader, path::PathBuf};

#[derive(Args)]
pub struct ListArgs {
    /// An input rpack file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Also print the type sections and whether their data is readable
    #[arg(long, default_value_t = false)]
    sections: bool,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let f = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        let rpack = RpackArchive::new(BufReader::new(f))
            .context(format!("reading {}", &self.file.display()))?;

        let header = rpack.header();
        println!(
            "{} version {}: {} resources, {} physical records, {} sections",
            String::from_utf8_lossy(&header.magic).bold(),
            header.version,
            rpack.len(),
            header.phys_res_count,
            header.phys_res_type_count
        );

        for entry in rpack.resources() {
            println!(
                "{:>6} {:<24} {:>3} {}",
                entry.index,
                entry.type_name.cyan(),
                entry.part_count,
                entry.name
            );
        }

        println!();
        for (type_name, count) in rpack
            .resources()
            .counts_by(|entry| entry.type_name)
            .into_iter()
            .sorted()
        {
            println!("{:<24} {count}", type_name.bold());
        }

        if self.sections {
            println!();
            for (i, section) in rpack.sections().iter().enumerate() {
                let state = match rpack.section_data(i) {
                    Some(SectionData::Raw) => "raw".green().to_string(),
                    Some(SectionData::Decompressed(data)) => {
                        format!("decompressed {} bytes", data.len()).green().to_string()
                    }
                    _ => "unavailable".red().to_string(),
                };
                println!(
                    "{i:>4} offset {:>10} size {:>10} compressed {:>10} {state}",
                    section.byte_offset().unwrap_or_default(),
                    section.data_byte_size,
                    section.compressed_byte_size
                );
            }
        }

        Ok(())
    }
}

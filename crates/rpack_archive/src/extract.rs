//! Extraction of a whole archive into a directory tree

use bon::Builder;
use std::{
    fs,
    io::{Read, Seek},
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::Result,
    read::{CompressedSections, RpackArchive},
    write::write_resource,
};

/// Options for how an archive should be extracted
#[derive(Debug, Clone, Copy, Default, Builder)]
pub struct ExtractOptions {
    /// What to do with parts stored in compressed sections
    #[builder(default)]
    pub compressed_sections: CompressedSections,
}

/// Outcome of an extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Logical resources in the archive
    pub resources: usize,

    /// Resources that produced at least one file
    pub extracted: usize,

    /// Resources without any readable part, or that their writer declined
    pub skipped: usize,

    /// Resources that could not be written at all
    pub failed: usize,

    /// Every file created, in creation order
    pub files: Vec<PathBuf>,
}

impl<R: Read + Seek> RpackArchive<R> {
    /// Extract every logical resource into `<root>/<type display name>/`.
    ///
    /// Only failing to create `root` is an error, problems with single resources are logged
    /// and counted in the returned [`ExtractSummary`].
    #[instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn extract<P: AsRef<Path>>(
        &mut self,
        root: P,
        options: ExtractOptions,
    ) -> Result<ExtractSummary> {
        let root = root.as_ref();
        fs::create_dir_all(root)?;

        let mut summary = ExtractSummary {
            resources: self.len(),
            ..Default::default()
        };

        for index in 0..self.len() {
            let resource = self.assemble(index, options.compressed_sections)?;
            if resource.is_empty() {
                debug!(index, name = %resource.base_name, "resource has no parts, skipping");
                summary.skipped += 1;
                continue;
            }

            let dir = root.join(resource.type_name);
            if let Err(e) = fs::create_dir_all(&dir) {
                warn!(index, dir = %dir.display(), error = %e, "unable to create output directory");
                summary.failed += 1;
                continue;
            }

            match write_resource(&resource, &dir) {
                Ok(files) if files.is_empty() => summary.skipped += 1,
                Ok(files) => {
                    summary.extracted += 1;
                    summary.files.extend(files);
                }
                Err(e) => {
                    warn!(
                        index,
                        name = %resource.base_name,
                        error = %e,
                        "unable to write resource"
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(
            resources = summary.resources,
            extracted = summary.extracted,
            skipped = summary.skipped,
            failed = summary.failed,
            files = summary.files.len(),
            "extraction finished"
        );

        Ok(summary)
    }
}

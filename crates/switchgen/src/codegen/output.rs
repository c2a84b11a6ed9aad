use crate::error::Result;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::{CodeGenerator, GenerationSummary};

/// One schema written by [`CodeGenerator::write_to_disk`]
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub summary: GenerationSummary,
}

impl CodeGenerator {
    /// Generate every schema into `out_dir`, one file per schema named after
    /// the schema's file stem.
    ///
    /// Each schema is an independent pass. A file is only written once its
    /// pass has succeeded; the first failing schema stops the batch.
    pub fn write_to_disk(
        &self,
        inputs: &[PathBuf],
        out_dir: &Path,
        extension: &str,
    ) -> Result<Vec<GeneratedFile>> {
        fs::create_dir_all(out_dir)?;

        let mut written = Vec::with_capacity(inputs.len());
        let mut outputs = HashSet::new();

        for source in inputs {
            let stem = source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "generated".to_string());
            let output = out_dir.join(format!("{stem}.{extension}"));
            if !outputs.insert(output.clone()) {
                tracing::warn!(
                    source = %source.display(),
                    output = %output.display(),
                    "output file already generated from another schema, overwriting"
                );
            }

            let mut buffer = Vec::new();
            let summary = self.generate_file(source, &mut buffer)?;
            fs::write(&output, buffer)?;

            written.push(GeneratedFile {
                source: source.clone(),
                output,
                summary,
            });
        }

        Ok(written)
    }
}

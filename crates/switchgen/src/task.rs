//! Build-host adapter.
//!
//! A host build system hands [`GenerateSourceTask`] a schema path and gets a
//! boolean back. The generated source is not written anywhere; every line of
//! it is relayed to the host's log instead.

use crate::codegen::{CodeGenerator, GeneratorOptions};
use crate::error::{CodegenError, Result};
use std::path::PathBuf;

/// Log target generated lines are relayed under
pub const TASK_LOG_TARGET: &str = "switchgen::task";

#[derive(Debug, Clone)]
pub struct GenerateSourceTask {
    /// Schema file to generate from
    pub source: PathBuf,
    pub options: GeneratorOptions,
}

impl GenerateSourceTask {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            options: GeneratorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the pass and relay its output through `tracing`.
    ///
    /// Returns `false` if the schema could not be read or parsed; the
    /// failure is logged as an error.
    pub fn execute(&self) -> bool {
        let result = self.execute_with(|line| {
            tracing::info!(target: TASK_LOG_TARGET, "{line}");
        });
        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(
                    target: TASK_LOG_TARGET,
                    source = %self.source.display(),
                    "source generation failed: {err}"
                );
                false
            }
        }
    }

    /// Run the pass and hand each generated line to `log`.
    ///
    /// Nothing is relayed unless the whole pass succeeds.
    pub fn execute_with(&self, mut log: impl FnMut(&str)) -> Result<()> {
        let mut buffer = Vec::new();
        CodeGenerator::new(self.options).generate_file(&self.source, &mut buffer)?;

        let text = String::from_utf8(buffer).map_err(|e| CodegenError::Other {
            message: "generated source is not valid UTF-8".into(),
            source: Some(Box::new(e)),
        })?;
        for line in text.lines() {
            log(line);
        }
        Ok(())
    }
}

use crate::error::{CodegenError, Result};
use std::path::{Path, PathBuf};

/// Extension of rule schema files picked up from directories
pub const SCHEMA_EXTENSION: &str = "xml";

fn has_glob_chars(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
}

/// Resolve files, directories and glob patterns to schema paths.
///
/// Directories are walked recursively for `.xml` files, sorted for stable
/// output. Literal file paths are passed through untouched so that missing
/// files surface as IO errors when they are read. A glob or directory that
/// matches nothing is an error.
pub fn resolve_inputs<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = Vec::new();

    for raw in patterns {
        let pattern = raw.as_ref();
        let before = out.len();

        if has_glob_chars(pattern) {
            let paths = glob::glob(pattern).map_err(|e| CodegenError::Other {
                message: format!("invalid glob pattern {pattern}"),
                source: Some(Box::new(e)),
            })?;
            for entry in paths {
                let path = entry.map_err(|e| CodegenError::Io(e.into()))?;
                if path.is_file() {
                    out.push(path);
                }
            }
        } else if Path::new(pattern).is_dir() {
            out.extend(find_schemas(Path::new(pattern)));
        } else {
            out.push(PathBuf::from(pattern));
            continue;
        }

        if out.len() == before {
            return Err(CodegenError::NoInputs {
                pattern: pattern.to_string(),
            });
        }
    }

    Ok(out)
}

/// All `.xml` files below `dir`, in sorted order
pub fn find_schemas(dir: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(SCHEMA_EXTENSION))
        })
        .collect()
}

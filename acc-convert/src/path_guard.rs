use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Check that no output file names a source file or another output.
pub fn ensure_outputs_distinct(outputs: &[&Path], sources: &[PathBuf]) -> Result<()> {
    let sources = sources
        .iter()
        .map(|source| Ok((comparable(source)?, source.as_path())))
        .collect::<Result<Vec<_>>>()?;

    let mut seen: Vec<(PathBuf, &Path)> = Vec::with_capacity(outputs.len());
    for output in outputs {
        let resolved = comparable(output)?;
        if let Some((_, source)) = sources.iter().find(|(path, _)| *path == resolved) {
            bail!(
                "refusing to overwrite source file: output {} matches input {}",
                output.display(),
                source.display()
            );
        }
        if let Some((_, earlier)) = seen.iter().find(|(path, _)| *path == resolved) {
            bail!(
                "output {} is also used for {}",
                output.display(),
                earlier.display()
            );
        }
        seen.push((resolved, output));
    }
    Ok(())
}

/// Absolute form of `path` for equality checks. Missing files resolve
/// through their parent directory when it exists.
fn comparable(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", path.display()));
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("failed to read the working directory")?
            .join(path)
    };
    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) if parent.exists() => Ok(parent
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", parent.display()))?
            .join(name)),
        _ => Ok(absolute),
    }
}

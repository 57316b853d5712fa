use std::path::Path;

use log::{info, warn};

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::features::pipeline::read_png_file;
use crate::metrics::class_index;

/// One labelled input vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input: Vec<f64>,
    pub class: usize,
}

/// Loads a labelled image directory.
///
/// Expects one sub-directory per class, named by its symbol (`0`-`9`,
/// `A`-`Z`), each holding PNG files. Directories that do not name a class
/// are skipped with a warning. A class at or beyond `classes`, the width of
/// the network being trained, is a `Format` error, as is an image that fails
/// to decode. Files are visited in sorted order so the result is reproducible.
pub fn load_dataset<P: AsRef<Path>>(dir: P, config: &EngineConfig, classes: usize) -> Result<Vec<Sample>> {
    let dir = dir.as_ref();
    let mut class_dirs: Vec<_> = std::fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    class_dirs.sort();

    let mut samples = Vec::new();
    for class_dir in class_dirs {
        let name = class_dir.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let mut chars = name.chars();
        let class = match (chars.next(), chars.next()) {
            (Some(c), None) => class_index(c),
            _ => None,
        };
        let Some(class) = class else {
            warn!("skipping {}: not a class directory", class_dir.display());
            continue;
        };
        if class >= classes {
            return Err(Error::Format(format!(
                "{}: class {class} is outside the {classes} network outputs",
                class_dir.display()
            )));
        }

        let mut files: Vec<_> = std::fs::read_dir(&class_dir)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|e| e.path())
            .filter(|p| p.extension().map_or(false, |e| e.eq_ignore_ascii_case("png")))
            .collect();
        files.sort();

        for file in files {
            let input = read_png_file(&file, config, false).map_err(|e| match e {
                Error::Format(msg) => Error::Format(format!("{}: {msg}", file.display())),
                other => other,
            })?;
            samples.push(Sample { input, class });
        }
    }

    info!("loaded {} samples from {}", samples.len(), dir.display());
    Ok(samples)
}

use std::{
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, Write},
    num::NonZeroUsize,
    ops::Range,
    path::{Path, PathBuf},
};

use log::{info, warn};

use crate::Result;

/// The range of records held by fold `fold` out of `num_folds`.
///
/// Ranges are contiguous, disjoint, cover `[0..total)` and their sizes differ by at most 1.
pub fn fold_range(total: usize, fold: usize, num_folds: NonZeroUsize) -> Range<usize> {
    let num_folds = num_folds.get();
    let base = total / num_folds;
    let rem = total % num_folds;

    let start = fold * base + fold.min(rem);
    let extra = if fold < rem { 1 } else { 0 };

    start..start + base + extra
}

/// The files the folds of `base` are written to, `<base>_<i>` for every fold `i`.
pub fn fold_names(base: &str, num_folds: NonZeroUsize) -> Vec<PathBuf> {
    (0..num_folds.get())
        .map(|i| PathBuf::from(format!("{base}_{i}")))
        .collect()
}

/// Splits the records of `base` into `num_folds` contiguous fold files.
///
/// Blank lines are dropped, every other line is copied verbatim.
///
/// # Returns
/// The paths of the fold files, in fold order. On error every fold file created so far
/// is removed.
pub fn split(base: &str, num_folds: NonZeroUsize) -> Result<Vec<PathBuf>> {
    let total = records(base)?.try_fold(0, |n, line| line.map(|_| n + 1))?;
    let paths = fold_names(base, num_folds);

    let mut created = 0;
    if let Err(e) = write_folds(base, &paths, total, num_folds, &mut created) {
        remove_folds(&paths[..created]);
        return Err(e);
    }

    info!("split {total} records of {base} into {num_folds} folds");
    Ok(paths)
}

fn write_folds(
    base: &str,
    paths: &[PathBuf],
    total: usize,
    num_folds: NonZeroUsize,
    created: &mut usize,
) -> Result<()> {
    let mut lines = records(base)?;

    for (fold, path) in paths.iter().enumerate() {
        let range = fold_range(total, fold, num_folds);
        let mut file = BufWriter::new(File::create(path)?);
        *created += 1;

        for line in lines.by_ref().take(range.len()) {
            writeln!(file, "{}", line?)?;
        }

        file.flush()?;
    }

    Ok(())
}

/// Best effort removal of the fold files, failures are only logged.
pub fn remove_folds(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!("failed to remove fold file {}: {e}", path.display());
        }
    }
}

fn records<P: AsRef<Path>>(path: P) -> Result<impl Iterator<Item = std::io::Result<String>>> {
    let lines = BufReader::new(File::open(path)?).lines();

    Ok(lines.filter(|line| !matches!(line, Ok(line) if line.trim().is_empty())))
}

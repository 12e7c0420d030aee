use log::debug;
use machine_learning::reading::Reader;

use crate::{Interrupt, Result};

/// The largest feature index and field id seen by a pre-scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Maxima {
    pub max_feature: usize,
    pub max_field: usize,
}

/// Reads every reader to exhaustion, folding their rows into a single running maximum,
/// and rewinds each of them afterwards.
///
/// # Arguments
/// * `readers` - Every reader of the run, the maxima are shared among all of them.
/// * `field_aware` - Whether to track field ids too.
/// * `interrupt` - Checked between batches.
///
/// # Returns
/// The maxima across the concatenation of every reader's content.
pub fn scan(
    readers: &mut [Box<dyn Reader>],
    field_aware: bool,
    interrupt: &Interrupt,
) -> Result<Maxima> {
    let mut maxima = Maxima::default();

    for reader in readers.iter_mut() {
        let mut rows = 0;

        loop {
            interrupt.check()?;

            let batch = reader.samples()?;
            if batch.is_empty() {
                break;
            }

            rows += batch.len();
            maxima.max_feature = maxima.max_feature.max(batch.max_index());
            if field_aware {
                maxima.max_field = maxima.max_field.max(batch.max_field());
            }
        }

        reader.reset()?;

        if let Some(path) = reader.path() {
            debug!("scanned {rows} rows from {}", path.display());
        }
    }

    Ok(maxima)
}

#[cfg(test)]
mod tests {
    use std::{io::Write, num::NonZeroUsize, sync::Arc};

    use machine_learning::{
        parsing::{LibffmParser, Parser},
        reading::{DiskReader, MemoryReader},
    };
    use tempfile::NamedTempFile;

    use super::*;
    use crate::SolverErr;

    fn fixture(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    fn readers(files: &[&NamedTempFile], batch_size: usize, on_disk: bool) -> Vec<Box<dyn Reader>> {
        let parser: Arc<dyn Parser> = Arc::new(LibffmParser::new());
        let batch_size = NonZeroUsize::new(batch_size).unwrap();

        files
            .iter()
            .map(|file| {
                let mut reader: Box<dyn Reader> = if on_disk {
                    Box::new(DiskReader::new())
                } else {
                    Box::new(MemoryReader::new())
                };
                reader
                    .initialize(file.path(), batch_size, Arc::clone(&parser))
                    .unwrap();
                reader
            })
            .collect()
    }

    #[test]
    fn maxima_span_every_reader_for_any_batch_size() {
        let train = fixture(&["1 1:3:1 2:5:1", "0 1:2:1", "1 4:1:1"]);
        let test = fixture(&["0 2:9:1", "1 3:1:1"]);
        let expected = Maxima {
            max_feature: 9,
            max_field: 4,
        };

        for on_disk in [false, true] {
            for batch_size in [1, 2, 3, 64] {
                let mut readers = readers(&[&train, &test], batch_size, on_disk);
                let interrupt = Interrupt::new();

                let first = scan(&mut readers, true, &interrupt).unwrap();
                let second = scan(&mut readers, true, &interrupt).unwrap();

                assert_eq!(first, expected);
                assert_eq!(second, expected);
            }
        }
    }

    #[test]
    fn fields_are_ignored_unless_field_aware() {
        let file = fixture(&["1 7:3:1"]);
        let mut readers = readers(&[&file], 4, false);

        let maxima = scan(&mut readers, false, &Interrupt::new()).unwrap();

        assert_eq!(
            maxima,
            Maxima {
                max_feature: 3,
                max_field: 0,
            }
        );
    }

    #[test]
    fn triggered_interrupt_stops_the_scan() {
        let file = fixture(&["1 1:1:1"]);
        let mut readers = readers(&[&file], 1, false);
        let interrupt = Interrupt::new();
        interrupt.trigger();

        let err = scan(&mut readers, true, &interrupt).unwrap_err();
        assert!(matches!(err, SolverErr::Interrupted));
    }
}

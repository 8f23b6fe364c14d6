//! Centrality result file: one `"<1-based id> <score>"` line per node.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{debug, instrument};

use crate::error::CentralityError;

/// Default number of decimal digits per score.
pub const DEFAULT_PRECISION: usize = 6;

/// Render `scores` in the result file format.
#[must_use]
pub fn format_scores(scores: &[f64], precision: usize) -> String {
    let mut out = String::with_capacity(scores.len() * (precision + 8));
    for (idx, score) in scores.iter().enumerate() {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{} {score:.precision$}", idx + 1);
    }
    out
}

/// Stream `scores` into any writer.
///
/// # Errors
///
/// Propagates the writer's I/O errors.
pub fn write_scores_to<W: Write>(writer: &mut W, scores: &[f64], precision: usize) -> io::Result<()> {
    for (idx, score) in scores.iter().enumerate() {
        writeln!(writer, "{} {score:.precision$}", idx + 1)?;
    }
    writer.flush()
}

/// Create (or truncate) `path` and write `scores` to it.
///
/// # Errors
///
/// Returns [`CentralityError::Write`] if the file cannot be created or written.
#[instrument(skip(scores), fields(nodes = scores.len()))]
pub fn write_scores(path: &Path, scores: &[f64], precision: usize) -> Result<(), CentralityError> {
    let to_write_error = |source| CentralityError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(to_write_error)?;
    let mut writer = BufWriter::new(file);
    write_scores_to(&mut writer, scores, precision).map_err(to_write_error)?;

    debug!(path = %path.display(), "scores written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_one_line_per_node_with_one_based_ids() {
        let text = format_scores(&[0.0, 1.0, 0.5], DEFAULT_PRECISION);
        assert_eq!(text, "1 0.000000\n2 1.000000\n3 0.500000\n");
    }

    #[test]
    fn precision_is_configurable() {
        assert_eq!(format_scores(&[2.0 / 3.0], 2), "1 0.67\n");
        assert_eq!(format_scores(&[12.0], 0), "1 12\n");
    }

    #[test]
    fn empty_scores_produce_empty_output() {
        assert_eq!(format_scores(&[], DEFAULT_PRECISION), "");
    }

    #[test]
    fn streamed_output_matches_formatted_string() {
        let scores = [3.25, 0.0, 1.0 / 3.0];
        let mut buf = Vec::new();
        write_scores_to(&mut buf, &scores, 4).expect("vec writer");
        assert_eq!(String::from_utf8(buf).expect("utf8"), format_scores(&scores, 4));
    }

    #[test]
    fn write_scores_creates_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.txt");
        write_scores(&path, &[1.0, 2.0], DEFAULT_PRECISION).expect("writable");
        let text = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(text, "1 1.000000\n2 2.000000\n");
    }

    #[test]
    fn unwritable_path_is_a_write_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing-dir").join("out.txt");
        let err = write_scores(&path, &[1.0], DEFAULT_PRECISION).expect_err("no parent dir");
        assert!(matches!(err, CentralityError::Write { .. }));
    }
}

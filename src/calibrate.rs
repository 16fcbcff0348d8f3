//! Panel color correction: coordinate intake, offset computation, and
//! the coefficient-to-table classification.

use std::fs;
use std::path::PathBuf;

use log::debug;

use crate::panel::{
    COORDINATE_DATA, color_offset_f1, color_offset_f2, color_offset_f3, color_offset_f4,
};

/// Source of the factory panel color coordinate.
///
/// Returns `None` when the coordinate is not available; correction is
/// then skipped for the process lifetime.
pub trait CoordinateSource: Send + Sync {
    /// The (x, y) coordinate pair, if one can be read.
    fn coordinate(&self) -> Option<(i32, i32)>;
}

/// Reads the coordinate from a text file holding `x, y`.
///
/// Platforms expose the factory coordinate as a one-line attribute
/// file; this is the stock source for them.
pub struct FileCoordinateSource {
    path: PathBuf,
}

impl FileCoordinateSource {
    /// Read from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CoordinateSource for FileCoordinateSource {
    fn coordinate(&self) -> Option<(i32, i32)> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                debug!("coordinate open skip: {}: {}", self.path.display(), err);
                return None;
            }
        };
        parse_coordinate(&text)
    }
}

fn parse_coordinate(text: &str) -> Option<(i32, i32)> {
    let (x, y) = text.trim().split_once(',')?;
    let x = x.trim().parse().ok()?;
    let y = y.trim().parse().ok()?;
    Some((x, y))
}

/// Compute the four signed correction offsets for a panel coordinate.
pub fn color_offsets(x: i32, y: i32) -> [i32; 4] {
    [
        color_offset_f1(x, y),
        color_offset_f2(x, y),
        color_offset_f3(x, y),
        color_offset_f4(x, y),
    ]
}

/// Maps correction offsets to a calibration table index.
///
/// The numeric policy is product-specific, so the controller takes the
/// classifier as an injected value; [`SignClassifier`] is the stock
/// implementation.
pub trait CalibrationClassifier: Send + Sync {
    /// The calibration table index in `1..=9` for these offsets.
    fn classify(&self, offsets: &[i32; 4]) -> u32;
}

/// Stock classifier: the signs of (f1, f2) pick a column of the
/// coordinate plane, the signs of (f3, f4) a row inside it.
pub struct SignClassifier;

impl CalibrationClassifier for SignClassifier {
    fn classify(&self, offsets: &[i32; 4]) -> u32 {
        let [f1, f2, f3, f4] = *offsets;
        let index = if f1 > 0 {
            if f3 > 0 {
                3
            } else if f4 < 0 {
                1
            } else {
                2
            }
        } else if f2 < 0 {
            if f3 > 0 {
                9
            } else if f4 < 0 {
                7
            } else {
                8
            }
        } else if f3 > 0 {
            6
        } else if f4 < 0 {
            4
        } else {
            5
        };
        index.clamp(1, 9)
    }
}

/// The calibration white point for a classified index; `None` for the
/// dummy slot 0 or an out-of-table index.
pub(crate) fn coordinate_rgb(index: u32) -> Option<(u8, u8, u8)> {
    if index == 0 {
        return None;
    }
    COORDINATE_DATA.get(index as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_attribute_format() {
        assert_eq!(parse_coordinate("2931, 3085\n"), Some((2931, 3085)));
        assert_eq!(parse_coordinate("2931,3085"), Some((2931, 3085)));
        assert_eq!(parse_coordinate("garbage"), None);
        assert_eq!(parse_coordinate("12"), None);
    }

    #[test]
    fn classifier_covers_all_nine_regions() {
        let c = SignClassifier;
        assert_eq!(c.classify(&[1, 0, 0, -1]), 1);
        assert_eq!(c.classify(&[1, 0, 0, 0]), 2);
        assert_eq!(c.classify(&[1, 0, 1, 0]), 3);
        assert_eq!(c.classify(&[0, 0, 0, -1]), 4);
        assert_eq!(c.classify(&[0, 0, 0, 0]), 5);
        assert_eq!(c.classify(&[0, 0, 1, 0]), 6);
        assert_eq!(c.classify(&[0, -1, 0, -1]), 7);
        assert_eq!(c.classify(&[0, -1, 0, 0]), 8);
        assert_eq!(c.classify(&[0, -1, 1, 0]), 9);
    }

    #[test]
    fn every_index_has_a_white_point() {
        assert_eq!(coordinate_rgb(0), None);
        assert_eq!(coordinate_rgb(10), None);
        for index in 1..=9 {
            assert!(coordinate_rgb(index).is_some());
        }
    }

    #[test]
    fn missing_file_reads_as_unavailable() {
        let source = FileCoordinateSource::new("/nonexistent/coordinate");
        assert_eq!(source.coordinate(), None);
    }
}

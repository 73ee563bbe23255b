//! Phase 2: Range Selection
//!
//! Cuts an inclusive, contiguous slice out of the ordered version list.
//!
//! ## Rules
//!
//! - No boundaries: the whole list, unchanged.
//! - Both boundaries: the slice from `from` through `to`. Either name missing
//!   from the list is `RangeNotFound`; `to` positioned before `from` is
//!   `InvalidRange`.
//! - Only one boundary: it is ignored with a warning and the whole list is
//!   returned. A range needs both ends.
//!
//! Boundaries are found by exact name equality and compared by position in
//! the supplied list, never by parsing the names as versions.

use log::warn;

use crate::error::{Boundary, Error, Result};

/// Select the inclusive range `from..=to` out of `versions`.
pub fn select_range<'a, T: AsRef<str>>(
    versions: &'a [T],
    from: Option<&str>,
    to: Option<&str>,
) -> Result<&'a [T]> {
    let (from, to) = match (from, to) {
        (Some(from), Some(to)) => (from, to),
        (None, None) => return Ok(versions),
        (Some(name), None) | (None, Some(name)) => {
            warn!(
                "Ignoring lone range boundary '{}': both ends are needed, aggregating all versions",
                name
            );
            return Ok(versions);
        }
    };
    let start = position(versions, from, Boundary::From)?;
    let end = position(versions, to, Boundary::To)?;

    if end < start {
        return Err(Error::InvalidRange {
            from: versions[start].as_ref().to_string(),
            to: versions[end].as_ref().to_string(),
        });
    }

    Ok(&versions[start..=end])
}

fn position<T: AsRef<str>>(versions: &[T], name: &str, boundary: Boundary) -> Result<usize> {
    versions
        .iter()
        .position(|v| v.as_ref() == name)
        .ok_or_else(|| Error::RangeNotFound {
            boundary,
            name: name.to_string(),
        })
}

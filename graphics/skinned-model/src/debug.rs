//! Trimmed `Debug` formatting for large per-vertex arrays

use std::{cmp, fmt};

const FIRST_N_ELEMENTS: usize = 3;

#[cfg(not(feature = "debug-print-all"))]
pub(crate) fn trimmed_collection_fmt<T: fmt::Debug>(
    items: &Vec<T>,
    f: &mut fmt::Formatter,
) -> fmt::Result {
    let end = cmp::min(FIRST_N_ELEMENTS, items.len());
    let remaining = items.len() - end;

    if remaining == 0 {
        write!(f, "{:?}", items)
    } else {
        write!(f, "{:?} + {} elements", &items[..end], remaining)
    }
}

#[cfg(feature = "debug-print-all")]
pub(crate) fn trimmed_collection_fmt<T: fmt::Debug>(
    items: &Vec<T>,
    f: &mut fmt::Formatter,
) -> fmt::Result {
    write!(f, "{:?}", items)
}

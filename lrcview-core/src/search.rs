//! "Last element with start time <= t" lookup shared by lines and words.

use crate::lrc::{LrcLine, LrcWord};

/// Anything with a start time in seconds
pub trait Timed {
    fn time(&self) -> f64;
}

impl Timed for LrcLine {
    fn time(&self) -> f64 {
        self.time
    }
}

impl Timed for LrcWord {
    fn time(&self) -> f64 {
        self.time
    }
}

impl Timed for f64 {
    fn time(&self) -> f64 {
        *self
    }
}

/// Binary search for the greatest index whose time is `<= time`.
///
/// Returns `None` when every element starts after `time`, when `items` is
/// empty, or when `time` is NaN. Equal times resolve to the highest index.
/// `items` is expected in ascending order; for unsorted input the result is
/// whatever the bisection lands on.
#[must_use]
pub fn search_time_before<T: Timed>(items: &[T], time: f64) -> Option<usize> {
    items
        .partition_point(|item| item.time() <= time)
        .checked_sub(1)
}

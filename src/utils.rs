//! Shared utility functions and traits

/// Extension trait for tracking a running minimum in `Option<T>`.
///
/// # Example
///
/// ```
/// use keyscan_diagnostics::utils::MinExt;
///
/// // Shortest gap between key transitions, in ms
/// let mut min_interval: Option<u64> = None;
///
/// min_interval.update_min(12);
/// assert_eq!(min_interval, Some(12));
///
/// min_interval.update_min(4);
/// min_interval.update_min(9);  // 9 > 4, so min stays 4
/// assert_eq!(min_interval, Some(4));
/// ```
pub trait MinExt<T: Ord + Copy> {
    /// Store `value` if it is smaller than the current minimum or if no
    /// minimum exists yet.
    fn update_min(&mut self, value: T);
}

impl<T: Ord + Copy> MinExt<T> for Option<T> {
    fn update_min(&mut self, value: T) {
        *self = Some(self.map_or(value, |m| m.min(value)));
    }
}

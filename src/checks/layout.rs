//! Responsive layout checks over tile positions.

use crate::amazon::session::Device;
use std::ops::RangeInclusive;

/// Number of layout columns given the tiles' rounded left edges.
pub fn column_count(lefts: &[i64]) -> usize {
    let mut unique = lefts.to_vec();
    unique.sort_unstable();
    unique.dedup();
    unique.len()
}

/// Column range the storefront is expected to render per device.
pub fn expected_columns(device: Device) -> RangeInclusive<usize> {
    match device {
        Device::Desktop => 2..=5,
        Device::Tablet => 1..=3,
        Device::Phone => 1..=1,
    }
}

/// Whether the observed column count fits the device's expected range.
pub fn columns_acceptable(device: Device, columns: usize) -> bool {
    expected_columns(device).contains(&columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_count_dedupes() {
        assert_eq!(column_count(&[16, 336, 656, 16, 336, 656]), 3);
        assert_eq!(column_count(&[12, 12, 12]), 1);
        assert_eq!(column_count(&[]), 0);
    }

    #[test]
    fn test_expected_columns_per_device() {
        assert!(columns_acceptable(Device::Desktop, 4));
        assert!(!columns_acceptable(Device::Desktop, 1));
        assert!(columns_acceptable(Device::Tablet, 2));
        assert!(!columns_acceptable(Device::Tablet, 4));
        assert!(columns_acceptable(Device::Phone, 1));
        assert!(!columns_acceptable(Device::Phone, 2));
    }
}

//! Human-readable sizes

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Formats a byte count using 1024 steps, e.g. `1536` as `"1.50 KB"`
///
/// Sizes beyond the largest unit stay in TB.
pub fn format_size(bytes: u64, precision: usize) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.*} {}", precision, size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes() {
        assert_eq!(format_size(0, 2), "0.00 B");
        assert_eq!(format_size(1023, 2), "1023.00 B");
    }

    #[test]
    fn test_unit_steps() {
        assert_eq!(format_size(1024, 2), "1.00 KB");
        assert_eq!(format_size(1536, 2), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024, 2), "5.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024, 1), "3.0 GB");
    }

    #[test]
    fn test_stays_in_terabytes() {
        let two_pb = 2 * 1024u64.pow(5);
        assert_eq!(format_size(two_pb, 0), "2048 TB");
    }
}

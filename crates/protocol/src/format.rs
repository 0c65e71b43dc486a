/// Formats a byte count the way the upload list displays it.
///
/// Anything under 10 KiB is shown in KB, everything else in MB, both with
/// two decimals.
pub fn format_size(bytes: u64) -> String {
    let kib = bytes as f64 / 1024.0;
    if kib < 10.0 {
        return format!("{kib:.2}KB");
    }
    format!("{:.2}MB", kib / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_sizes_in_kb() {
        assert_eq!(format_size(0), "0.00KB");
        assert_eq!(format_size(512), "0.50KB");
        assert_eq!(format_size(10 * 1024 - 1), "10.00KB");
    }

    #[test]
    fn large_sizes_in_mb() {
        assert_eq!(format_size(10 * 1024), "0.01MB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00MB");
    }
}

//! Human readable byte sizes.

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
const STEP: f64 = 1024.0;

/// Formats a byte count (or a bytes-per-second rate) for display.
///
/// The unit is the largest of `Bytes`, `KB`, `MB`, `GB`, `TB` that keeps the
/// scaled value at or above one, and the value is rounded to two decimals with
/// trailing zeros dropped: `1536` becomes `"1.5 KB"`, `1024` becomes `"1 KB"`.
///
/// Callers pass finite, non-negative values.
pub fn format_size(bytes: f64) -> String {
    if bytes == 0.0 {
        return "0 Bytes".to_owned();
    }

    let index = unit_index(bytes);
    let scaled = bytes / STEP.powi(index as i32);
    let rounded = (scaled * 100.0).round() / 100.0;

    format!("{rounded} {}", UNITS[index])
}

/// Same as [`format_size`] with a `/s` suffix, for transfer speeds.
pub fn format_speed(bytes_per_second: f64) -> String {
    format!("{}/s", format_size(bytes_per_second))
}

/// `floor(log1024(bytes))` clamped to the unit table, computed by comparison
/// so exact powers of 1024 never land one unit short.
fn unit_index(bytes: f64) -> usize {
    let mut index = 0;
    let mut next = STEP;
    while index < UNITS.len() - 1 && bytes >= next {
        index += 1;
        next *= STEP;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_bytes() {
        assert_eq!(format_size(0.0), "0 Bytes");
    }

    #[test]
    fn picks_largest_unit_and_trims_zeros() {
        assert_eq!(format_size(1.0), "1 Bytes");
        assert_eq!(format_size(50.0), "50 Bytes");
        assert_eq!(format_size(1023.0), "1023 Bytes");
        assert_eq!(format_size(1024.0), "1 KB");
        assert_eq!(format_size(1536.0), "1.5 KB");
        assert_eq!(format_size(1_048_576.0), "1 MB");
        assert_eq!(format_size(5.25 * 1_073_741_824.0), "5.25 GB");
        assert_eq!(format_size(1_099_511_627_776.0), "1 TB");
    }

    #[test]
    fn rounds_to_two_decimals() {
        // 1234 / 1024 = 1.205078...
        assert_eq!(format_size(1234.0), "1.21 KB");
        // 1000 / 1024 would be below one, so it stays in bytes
        assert_eq!(format_size(1000.0), "1000 Bytes");
    }

    #[test]
    fn clamps_to_terabytes() {
        let two_pb = 2.0 * 1024f64.powi(5);
        assert_eq!(format_size(two_pb), "2048 TB");
    }

    #[test]
    fn fractional_rates_stay_in_bytes() {
        assert_eq!(format_size(0.5), "0.5 Bytes");
        assert_eq!(format_speed(0.25), "0.25 Bytes/s");
    }

    #[test]
    fn numeric_part_scales_back_to_input() {
        let samples = [
            1.0,
            7.0,
            999.0,
            4096.0,
            123_456.0,
            9_876_543.0,
            3_000_000_000.0,
            8_500_000_000_000.0,
        ];

        for bytes in samples {
            let formatted = format_size(bytes);
            let (number, unit) = formatted
                .split_once(' ')
                .expect("formatted size has a unit");
            let index = UNITS
                .iter()
                .position(|u| *u == unit)
                .expect("unit is known");
            let number: f64 = number.parse().expect("numeric part parses");
            let restored = number * 1024f64.powi(index as i32);
            let tolerance = 0.005 * 1024f64.powi(index as i32);

            assert!(
                (restored - bytes).abs() <= tolerance,
                "{bytes} formatted as {formatted} restores to {restored}"
            );
        }
    }

    #[test]
    fn speed_has_per_second_suffix() {
        assert_eq!(format_speed(50.0), "50 Bytes/s");
        assert_eq!(format_speed(2048.0), "2 KB/s");
    }
}

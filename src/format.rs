use std::fmt;

const SUFFIXES: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// A byte count rendered in the largest base-1024 unit whose scaled value
/// still has a nonzero integer part, with two decimals (`1.50MB`).
///
/// Values past the terabyte range stay in `TB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteSize(pub u64);

impl ByteSize {
    /// Scaled value and the unit it is expressed in.
    pub fn scaled(self) -> (f64, &'static str) {
        let mut value = self.0 as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit < SUFFIXES.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        (value, SUFFIXES[unit])
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (value, suffix) = self.scaled();
        write!(f, "{value:.2}{suffix}")
    }
}

pub fn format_bytes(bytes: u64) -> String {
    ByteSize(bytes).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(s: &str) -> (&str, &str) {
        let idx = s
            .find(|c: char| c.is_ascii_alphabetic())
            .expect("formatted size has a unit suffix");
        s.split_at(idx)
    }

    #[test]
    fn test_known_values() {
        assert_eq!(format_bytes(0), "0.00B");
        assert_eq!(format_bytes(1), "1.00B");
        assert_eq!(format_bytes(1023), "1023.00B");
        assert_eq!(format_bytes(1024), "1.00KB");
        assert_eq!(format_bytes(1536), "1.50KB");
        assert_eq!(format_bytes(1_048_576), "1.00MB");
        assert_eq!(format_bytes(1_073_741_824), "1.00GB");
        assert_eq!(format_bytes(1 << 40), "1.00TB");
    }

    #[test]
    fn test_beyond_terabytes_stays_in_tb() {
        assert_eq!(format_bytes(1 << 50), "1024.00TB");
        let max = format_bytes(u64::MAX);
        let (num, unit) = split(&max);
        assert_eq!(unit, "TB");
        assert!(num.parse::<f64>().unwrap() > 1024.0);
    }

    #[test]
    fn test_shape_of_output() {
        let samples = [0u64, 7, 999, 1024, 4097, 10 << 20, 3 << 30, 123_456_789_012, u64::MAX];
        for bytes in samples {
            let s = format_bytes(bytes);
            let (num, unit) = split(&s);
            assert!(SUFFIXES.contains(&unit), "{s}");
            let value: f64 = num.parse().unwrap();
            assert!(value >= 0.0);
            let decimals = num.split('.').nth(1).unwrap();
            assert_eq!(decimals.len(), 2, "{s}");
        }
    }

    #[test]
    fn test_scaled_integer_part_nonzero() {
        for bytes in [1u64, 1024, 5000, 1 << 21, 1 << 33] {
            let (value, _) = ByteSize(bytes).scaled();
            assert!(value >= 1.0);
            assert!(value < 1024.0);
        }
    }
}

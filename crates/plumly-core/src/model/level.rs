// ── Level scales ──
//
// Accessories speak percent (0-100); lightpads speak 0-255. Both
// directions round half up, in integer arithmetic.

/// Highest valid percentage.
pub const MAX_PERCENT: u8 = 100;

/// `round(percent / 100 * 255)`. Percentages above 100 saturate.
pub fn percent_to_device(percent: u8) -> u8 {
    let percent = u32::from(percent.min(MAX_PERCENT));
    u8::try_from((percent * 255 + 50) / 100).unwrap_or(u8::MAX)
}

/// `round(level / 255 * 100)`.
pub fn device_to_percent(level: u8) -> u8 {
    let level = u32::from(level);
    u8::try_from((level * 200 + 255) / 510).unwrap_or(MAX_PERCENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_map_exactly() {
        assert_eq!(percent_to_device(0), 0);
        assert_eq!(percent_to_device(100), 255);
        assert_eq!(device_to_percent(0), 0);
        assert_eq!(device_to_percent(255), 100);
    }

    #[test]
    fn fifty_percent_is_128() {
        assert_eq!(percent_to_device(50), 128);
        assert_eq!(device_to_percent(128), 50);
    }

    #[test]
    fn halves_round_up() {
        // 10% = 25.5 device units.
        assert_eq!(percent_to_device(10), 26);
        // 1% = 2.55 device units.
        assert_eq!(percent_to_device(1), 3);
    }

    #[test]
    fn saturates_above_hundred() {
        assert_eq!(percent_to_device(250), 255);
    }

    #[test]
    fn percent_round_trip_is_exact() {
        for p in 0..=MAX_PERCENT {
            assert_eq!(device_to_percent(percent_to_device(p)), p, "percent {p}");
        }
    }

    #[test]
    fn device_round_trip_within_one_step() {
        for level in 0..=u8::MAX {
            let back = percent_to_device(device_to_percent(level));
            assert!(back.abs_diff(level) <= 2, "level {level} came back as {back}");
        }
    }
}

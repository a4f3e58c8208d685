//! Conversion of brightness percentages into CAP1166 duty cycle codes.
//!
//! The chip encodes LED duty cycles as 4-bit codes on a non-linear scale.
//! Maximum and minimum duty codes sit on slightly different scales: a 100%
//! maximum is code 15, while the table lookup itself yields 16 for 100%.

/// Duty cycle percentage for each table code.
const DUTY_PERCENTAGES: [u8; 17] = [0, 7, 9, 11, 14, 17, 20, 23, 26, 30, 35, 40, 46, 53, 63, 77, 100];

/// Highest table code.
const MAX_TABLE_CODE: u8 = 16;

/// Highest value a 4-bit duty code can hold.
const MAX_DUTY_CODE: u8 = 15;

/// Maps `percentage` to the closest table code in `0..=16`.
///
/// When the percentage lies exactly between two table entries the lower code
/// wins. Percentages above 100 map to 16.
pub fn base_code(percentage: u8) -> u8 {
    for (i, bracket) in DUTY_PERCENTAGES.windows(2).enumerate() {
        let (lower, upper) = (bracket[0], bracket[1]);
        if lower <= percentage && percentage <= upper {
            let code = i as u8;
            return if percentage - lower <= upper - percentage {
                code
            } else {
                code + 1
            };
        }
    }
    MAX_TABLE_CODE
}

/// Duty code for a maximum brightness percentage.
pub fn max_code(percentage: u8) -> u8 {
    base_code(percentage).saturating_sub(1)
}

/// Duty code for a minimum brightness percentage.
pub fn min_code(percentage: u8) -> u8 {
    base_code(percentage).min(MAX_DUTY_CODE)
}

/// Minimum and maximum duty codes for one LED behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyCycle {
    /// Minimum duty code, 0..=15.
    pub min: u8,
    /// Maximum duty code, 0..=15.
    pub max: u8,
}

impl DutyCycle {
    /// Builds a duty cycle from brightness percentages.
    ///
    /// The minimum is clamped so it never exceeds the maximum.
    pub fn from_percentages(max_percent: u8, min_percent: u8) -> Self {
        let max = max_code(max_percent);
        let min = min_code(min_percent).min(max);
        Self { min, max }
    }

    /// Register value: max code in the high nibble, min code in the low one.
    pub fn register_value(self) -> u8 {
        crate::reg::pack_duty(self.min, self.max)
    }
}

impl Default for DutyCycle {
    /// 0% to 100%, the chip's power-on duty cycle.
    fn default() -> Self {
        Self::from_percentages(100, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_end_points() {
        assert_eq!(base_code(0), 0);
        assert_eq!(base_code(100), 16);
        assert_eq!(base_code(101), 16);
        assert_eq!(base_code(255), 16);
    }

    #[test]
    fn exact_hits_return_their_index() {
        for (i, p) in DUTY_PERCENTAGES.iter().enumerate() {
            assert_eq!(base_code(*p), i as u8, "percentage {p}");
        }
    }

    #[test]
    fn closest_entry_wins() {
        // 50 is 4 away from 46 and 3 away from 53.
        assert_eq!(base_code(50), 13);
        assert_eq!(base_code(48), 12);
        assert_eq!(base_code(90), 16);
        assert_eq!(base_code(80), 15);
    }

    #[test]
    fn ties_go_to_the_lower_code() {
        assert_eq!(base_code(8), 1);
        assert_eq!(base_code(10), 2);
        assert_eq!(base_code(70), 14);
    }

    #[test]
    fn max_code_is_one_below_base() {
        for p in 0..=100u8 {
            assert_eq!(max_code(p), base_code(p).saturating_sub(1));
        }
        assert_eq!(max_code(100), 15);
        assert_eq!(max_code(0), 0);
    }

    #[test]
    fn min_code_is_capped_at_fifteen() {
        for p in 0..=100u8 {
            assert_eq!(min_code(p), base_code(p).min(15));
        }
        assert_eq!(min_code(100), 15);
        assert_eq!(min_code(77), 15);
    }

    #[test]
    fn duty_cycle_clamps_min_to_max() {
        let duty = DutyCycle::from_percentages(20, 90);
        assert_eq!(duty.max, 5);
        assert_eq!(duty.min, 5);
        for max in 0..=100u8 {
            for min in (0..=100u8).step_by(7) {
                let duty = DutyCycle::from_percentages(max, min);
                assert!(duty.min <= duty.max, "max {max}% min {min}%");
            }
        }
    }

    #[test]
    fn default_duty_cycle_is_full_range() {
        let duty = DutyCycle::default();
        assert_eq!(duty, DutyCycle { min: 0, max: 15 });
        assert_eq!(duty.register_value(), 0xF0);
    }
}

use crate::BalanceConfig;

/// Scalar applied to score and gamble payouts at `round`.
///
/// Pure so the rendering side can recompute previews with the same value.
pub fn round_multiplier(round: u32, config: &BalanceConfig) -> f64 {
    let round = f64::from(round.max(1));
    let linear = ratio((round - 1.0) * config.difficulty.level, config.round_multiplier_base);
    let curve = ratio(round, config.round_multiplier_power_base)
        .powf(config.round_multiplier_power_exponent);
    1.0 + linear + curve
}

/// `value / divisor`, or zero when the divisor is not a positive finite number.
pub(crate) fn ratio(value: f64, divisor: f64) -> f64 {
    if divisor.is_finite() && divisor > 0.0 {
        value / divisor
    } else {
        0.0
    }
}

pub fn scaled_score(base: i64, multiplier: f64) -> i64 {
    (base as f64 * multiplier).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! multiplier_case {
        ($name:ident, $round:expr, $expected:expr) => {
            #[test]
            fn $name() {
                let value = round_multiplier($round, &BalanceConfig::default());
                assert!(
                    (value - $expected).abs() < 1e-6,
                    "round {} gave {}",
                    $round,
                    value
                );
            }
        };
    }

    // 1 + (r-1)*0.4/80 + (r/300)^1.5
    multiplier_case!(multiplier_round_1, 1, 1.0 + (1.0f64 / 300.0).powf(1.5));
    multiplier_case!(multiplier_round_81, 81, 1.4 + (81.0f64 / 300.0).powf(1.5));
    multiplier_case!(multiplier_round_300, 300, 1.0 + 299.0 * 0.005 + 1.0);

    #[test]
    fn multiplier_never_decreases() {
        let config = BalanceConfig::default();
        let mut previous = round_multiplier(1, &config);
        for round in 2..2000 {
            let value = round_multiplier(round, &config);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn scaled_score_floors() {
        assert_eq!(scaled_score(40, 1.0001), 40);
        assert_eq!(scaled_score(25, 1.5), 37);
        assert_eq!(scaled_score(-5, 1.0001), -6);
    }

    #[test]
    fn zero_divisors_drop_their_term() {
        let mut config = BalanceConfig::default();
        config.round_multiplier_base = 0.0;
        config.round_multiplier_power_base = 0.0;
        for round in [1, 10, 500] {
            assert_eq!(round_multiplier(round, &config), 1.0);
        }
    }
}

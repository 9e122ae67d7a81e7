use super::types::{AxeChartsRating, CategoryCounters, MAX_TARGET_SCORE};

const RATING_SCALE: f64 = 1000.0;

/// Points earned against a flat five points available per throw.
///
/// Clutch attempts are valued at five like every other throw, so clutch hits can
/// push the rating above 1000.
pub fn axe_charts_rating(
    hatchet: &CategoryCounters,
    big_axe: &CategoryCounters,
) -> AxeChartsRating {
    let points_earned = hatchet.total_score + big_axe.total_score;
    let target_attempts = hatchet.target.throw_count + big_axe.target.throw_count;
    let clutch_attempts = hatchet.clutch.call + big_axe.clutch.call;
    let points_available = MAX_TARGET_SCORE * (target_attempts + clutch_attempts);

    AxeChartsRating {
        points_earned,
        points_available,
        rating: scale(points_earned, points_available),
    }
}

fn scale(points_earned: u32, points_available: u32) -> u32 {
    if points_available == 0 {
        return 0;
    }
    (RATING_SCALE * points_earned as f64 / points_available as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(total_score: u32, target_throws: u32, clutch_calls: u32) -> CategoryCounters {
        let mut c = CategoryCounters::default();
        c.total_score = total_score;
        c.target.throw_count = target_throws;
        c.clutch.call = clutch_calls;
        c
    }

    #[test]
    fn test_all_fives_rates_one_thousand() {
        let acr = axe_charts_rating(&counters(100, 20, 0), &CategoryCounters::default());

        assert_eq!(acr.points_earned, 100);
        assert_eq!(acr.points_available, 100);
        assert_eq!(acr.rating, 1000);
    }

    #[test]
    fn test_clutch_attempts_use_flat_denominator() {
        // four fives and one clutch hit
        let acr = axe_charts_rating(&counters(27, 4, 1), &CategoryCounters::default());

        assert_eq!(acr.points_available, 25);
        assert_eq!(acr.rating, 1080);
    }

    #[test]
    fn test_big_axe_points_count_toward_rating() {
        let acr = axe_charts_rating(&counters(60, 15, 0), &counters(3, 1, 0));

        assert_eq!(acr.points_earned, 63);
        assert_eq!(acr.points_available, 80);
        assert_eq!(acr.rating, 788);
    }

    #[test]
    fn test_no_throws_rates_zero() {
        let acr = axe_charts_rating(&CategoryCounters::default(), &CategoryCounters::default());

        assert_eq!(acr, AxeChartsRating::default());
    }
}

use analytics::histogram::histogram;
use analytics::ranking::{aggregate, distribution, rank_top};
use analytics::regression::fit;
use analytics::statistics::describe;
use analytics::AnalyticsError;
use core_types::Sample;
use proptest::prelude::*;

proptest! {
    #[test]
    fn constant_y_never_yields_nan_r2(c in -1.0e6f64..1.0e6, n in 2usize..50) {
        let samples: Vec<Sample> = (0..n).map(|i| Sample::pair(i as f64, c)).collect();
        let model = fit(&samples).unwrap();
        prop_assert_eq!(model.r2, 0.0);
    }

    #[test]
    fn identical_x_is_degenerate(x in -1.0e6f64..1.0e6, ys in prop::collection::vec(-1.0e3f64..1.0e3, 2..20)) {
        let samples: Vec<Sample> = ys.iter().map(|&y| Sample::pair(x, y)).collect();
        prop_assert!(matches!(fit(&samples), Err(AnalyticsError::DegenerateInput(_))));
    }

    #[test]
    fn r2_stays_in_unit_interval(ys in prop::collection::vec(-1.0e4f64..1.0e4, 2..40)) {
        let samples: Vec<Sample> = ys.iter().enumerate().map(|(i, &y)| Sample::pair(i as f64, y)).collect();
        let model = fit(&samples).unwrap();
        prop_assert!(model.r2.is_finite());
        prop_assert!((0.0..=1.0).contains(&model.r2));
    }

    #[test]
    fn single_value_has_zero_spread(v in -1.0e9f64..1.0e9) {
        let stats = describe(&[v]).unwrap();
        prop_assert_eq!(stats.std_dev, 0.0);
        prop_assert_eq!(stats.range, 0.0);
    }

    #[test]
    fn distribution_sums_to_one_hundred(values in prop::collection::vec(0.0f64..1.0e6, 1..30)) {
        prop_assume!(values.iter().sum::<f64>() > 0.0);
        let samples: Vec<Sample> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Sample::pair(format!("c{}", i).as_str(), v))
            .collect();
        let dist = distribution(&aggregate(&samples).unwrap());
        let total: f64 = dist
            .iter()
            .map(|e| e.percentage.trim_end_matches('%').parse::<f64>().unwrap())
            .sum();
        prop_assert!((total - 100.0).abs() <= 0.01 * dist.len() as f64);
    }

    #[test]
    fn rank_top_is_clamped_and_non_increasing(
        rows in prop::collection::vec((0usize..8, -1.0e3f64..1.0e3), 1..60),
        n in 1usize..12,
    ) {
        let samples: Vec<Sample> = rows
            .iter()
            .map(|&(c, v)| Sample::pair(format!("cat{}", c).as_str(), v))
            .collect();
        let totals = aggregate(&samples).unwrap();
        let top = rank_top(&totals, n);
        prop_assert_eq!(top.len(), n.min(totals.len()));
        for pair in top.windows(2) {
            prop_assert!(pair[0].value >= pair[1].value);
            prop_assert_eq!(pair[1].rank, pair[0].rank + 1);
        }
    }

    #[test]
    fn histogram_places_extremes_at_the_edges(
        values in prop::collection::vec(-1.0e4f64..1.0e4, 1..100),
        bins in 1usize..20,
    ) {
        let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assume!(lo < hi);
        let result = histogram(&values, bins).unwrap();
        prop_assert_eq!(result.len(), bins);
        prop_assert_eq!(result.iter().map(|b| b.count).sum::<usize>(), values.len());
        prop_assert!(result[0].count >= 1);
        prop_assert!(result[bins - 1].count >= 1);
    }

    #[test]
    fn fit_recovers_linear_coefficients(a in -50.0f64..50.0, b in -100.0f64..100.0, n in 3usize..30) {
        let samples: Vec<Sample> = (0..n).map(|i| Sample::pair(i as f64, a * i as f64 + b)).collect();
        let model = fit(&samples).unwrap();
        prop_assert!((model.slope - a).abs() < 1e-6);
        prop_assert!((model.intercept - b).abs() < 1e-6);
    }
}

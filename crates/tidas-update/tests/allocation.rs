use proptest::prelude::*;
use tidas_update::normalize_allocation_fraction;

proptest! {
    #[test]
    fn percentages_below_one_hundred_become_fractions(whole in 0u32..100, hundredths in 0u32..100) {
        let raw = format!("{whole}.{hundredths:02}%");
        let fraction = normalize_allocation_fraction(&raw).expect("valid percentage");
        let value: f64 = fraction.parse().expect("numeric fraction");
        let expected = f64::from(whole * 100 + hundredths) / 10_000.0;
        prop_assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn normalised_fractions_are_stable(raw in "0\\.[0-9]{1,6}") {
        let once = normalize_allocation_fraction(&raw).expect("valid fraction");
        prop_assert_eq!(normalize_allocation_fraction(&once), Some(once.clone()));
    }

    #[test]
    fn values_of_one_or_more_are_rejected(whole in 1u32..10_000) {
        prop_assert_eq!(normalize_allocation_fraction(&whole.to_string()), None);
        let percent = format!("{}%", whole * 100);
        prop_assert_eq!(normalize_allocation_fraction(&percent), None);
    }
}

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use geoclima_core::{
    AddressingMode, InMemoryLayerStore, LayerStore, MergeCoordinator, PeriodSelection,
    SynthesisContext, period_for_span, propagate, synthesize_params, validate_date_range,
};
use geoclima_model::{
    AvailableDateBounds, DateFormat, DateRange, LayerRef, PeriodType, RangeErrorKind,
};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
}

fn day(offset: u64) -> NaiveDate {
    base_date().checked_add_days(Days::new(offset)).unwrap()
}

/// Contiguous table: bucket `i` covers `[start_i, start_i + width_i - 1]`,
/// the first bucket starts at 0 with `min` omitted.
fn contiguous_table(widths: &[u32]) -> Vec<PeriodType> {
    let mut start = 0u32;
    widths
        .iter()
        .enumerate()
        .map(|(index, width)| {
            let min = (index > 0).then_some(start);
            let period = PeriodType::new(start + width, min, start + width - 1);
            start += width;
            period
        })
        .collect()
}

proptest! {
    /// Property: any range inside the bounds is accepted.
    #[test]
    fn prop_ranges_inside_bounds_validate(
        first in 0u64..5000,
        a in 0u64..2000,
        b in 0u64..2000,
        tail in 0u64..500,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let bounds = AvailableDateBounds::new(day(first), day(first + hi + tail));
        let result = validate_date_range(Some(day(first + lo)), Some(day(first + hi)), &bounds);
        prop_assert!(result.is_valid);
        prop_assert_eq!(result.error_message, None);
    }

    /// Property: an inverted range is rejected as RangeOrder whatever the bounds.
    #[test]
    fn prop_inverted_ranges_report_order(
        to in 0u64..5000,
        gap in 1u64..1000,
        first in 0u64..8000,
        last in 0u64..8000,
    ) {
        let bounds = AvailableDateBounds::new(day(first), day(last));
        let result = validate_date_range(Some(day(to + gap)), Some(day(to)), &bounds);
        prop_assert_eq!(result.error_message, Some(RangeErrorKind::RangeOrder));
    }

    /// Property: a contiguous, non-overlapping table buckets every covered day count
    /// into exactly one entry.
    #[test]
    fn prop_contiguous_tables_bucket_totally(
        widths in prop::collection::vec(1u32..40, 1..8),
        sample in 0u32..400,
    ) {
        let table = contiguous_table(&widths);
        let upper: u32 = widths.iter().sum();
        let days = i64::from(sample % upper);
        let found = period_for_span(days, &table).unwrap();
        let covering = table.iter().filter(|period| period.covers(days)).count();
        prop_assert_eq!(covering, 1);
        prop_assert!(found.covers(days));
    }

    /// Property: pairs follow stream order for any interleaving.
    #[test]
    fn prop_pairing_is_index_wise(order in prop::collection::vec(any::<bool>(), 0..24)) {
        let mut merge = MergeCoordinator::new();
        let (mut next_bounds, mut next_config) = (0u32, 0u32);
        let mut pairs = Vec::new();
        for bounds_first in order {
            let pair = if bounds_first {
                next_bounds += 1;
                merge.push_bounds(next_bounds)
            } else {
                next_config += 1;
                merge.push_config(next_config)
            };
            pairs.extend(pair);
        }
        for (index, (bounds, config)) in pairs.iter().enumerate() {
            let expected = u32::try_from(index).unwrap() + 1;
            prop_assert_eq!(*bounds, expected);
            prop_assert_eq!(*config, expected);
        }
        prop_assert_eq!(pairs.len(), next_bounds.min(next_config) as usize);
    }

    /// Property: formatting then parsing with the same pattern is the identity
    /// on calendar days.
    #[test]
    fn prop_format_parse_round_trip(
        offset in 0u64..40000,
        pattern in prop::sample::select(vec![
            "YYYY-MM-DD", "DD/MM/YYYY", "D-M-YYYY", "[day] DD [of] MM YYYY",
        ]),
    ) {
        let format = DateFormat::new(pattern).unwrap();
        let date = day(offset);
        prop_assert_eq!(format.parse(&format.format(date)).unwrap(), date);
    }

    /// Property: propagating the same params twice leaves the same params.
    #[test]
    fn prop_propagation_is_idempotent(span in 0u64..40, code in prop::sample::select(vec![1u32, 7, 10, 30])) {
        let periods = vec![
            PeriodType::new(1u32, None, 5),
            PeriodType::new(7u32, Some(6), 8),
            PeriodType::new(10u32, Some(9), 20),
            PeriodType::new(30u32, Some(21), 40),
        ];
        let format = DateFormat::iso();
        let context = SynthesisContext { periods: &periods, format: &format, mode: AddressingMode::Suffix };
        let to = day(9000);
        let range = DateRange::new(day(9000 - span), to);
        let params = synthesize_params(range, &PeriodSelection::Free, &context).unwrap();

        let mut store = InMemoryLayerStore::new(vec![
            LayerRef::new("a", "prec").with_map(format!("/maps/prec_{code}.map")),
            LayerRef::new("b", "tmax").with_map(format!("tmax_{code}.map")),
        ]);
        for instruction in propagate(store.layers(), &params, |_| true) {
            store.apply(&instruction);
        }
        let once = store.layers().to_vec();
        for instruction in propagate(store.layers(), &params, |_| true) {
            store.apply(&instruction);
        }
        prop_assert_eq!(store.layers(), once.as_slice());
    }
}

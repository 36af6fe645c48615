//! Aggregator service for computing comparison statistics

use super::price_parser::parse_price;
use crate::types::{ComparisonResult, PriceCompareError, PriceSummary, Result};

/// Aggregator for computing min/max/margin over a comparison result
pub struct ComparisonAggregator;

impl ComparisonAggregator {
    /// Compute summary statistics over every quote in `result`.
    ///
    /// Fail-fast: a single unparsable quote fails the whole aggregation with
    /// `InvalidPrice`. Dropping that store would misrepresent the comparison.
    /// A zero lowest price fails with `DegenerateInput` instead of producing
    /// an infinite margin. A single store yields a margin of 0.
    pub fn aggregate(result: &ComparisonResult) -> Result<PriceSummary> {
        if result.is_empty() {
            return Err(PriceCompareError::EmptyResult);
        }

        let mut cheapest: Option<(&str, f64)> = None;
        let mut priciest: Option<(&str, f64)> = None;

        for (store, quote) in result {
            let value =
                parse_price(&quote.price).map_err(|_| PriceCompareError::InvalidPrice {
                    store: store.clone(),
                    price: quote.price.clone(),
                })?;

            match cheapest {
                Some((_, min)) if value >= min => {}
                _ => cheapest = Some((store.as_str(), value)),
            }
            match priciest {
                Some((_, max)) if value <= max => {}
                _ => priciest = Some((store.as_str(), value)),
            }
        }

        // Non-empty result, so both are set
        let (Some((cheapest_store, min)), Some((priciest_store, max))) = (cheapest, priciest)
        else {
            return Err(PriceCompareError::EmptyResult);
        };

        if min == 0.0 {
            return Err(PriceCompareError::DegenerateInput);
        }

        Ok(PriceSummary {
            min,
            max,
            margin: (max - min) / min * 100.0,
            cheapest_store: cheapest_store.to_string(),
            priciest_store: priciest_store.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StoreQuote;

    fn make_result(prices: &[(&str, &str)]) -> ComparisonResult {
        prices
            .iter()
            .map(|(store, price)| {
                (
                    store.to_string(),
                    StoreQuote::new(*price, format!("https://{}.example/item", store)),
                )
            })
            .collect()
    }

    #[test]
    fn test_aggregate_two_stores() {
        let result = make_result(&[("A", "$10.00"), ("B", "$20.00")]);

        let summary = ComparisonAggregator::aggregate(&result).unwrap();

        assert!((summary.margin - 100.0).abs() < 1e-9);
        assert!((summary.min - 10.0).abs() < f64::EPSILON);
        assert!((summary.max - 20.0).abs() < f64::EPSILON);
        assert_eq!(summary.cheapest_store, "A");
        assert_eq!(summary.priciest_store, "B");
    }

    #[test]
    fn test_aggregate_three_marketplaces() {
        let result = make_result(&[
            ("Amazon", "$19.99"),
            ("eBay", "$15.00"),
            ("Walmart", "$18.00"),
        ]);

        let summary = ComparisonAggregator::aggregate(&result).unwrap();

        // (19.99 - 15) / 15 * 100 = 33.2666...
        assert!(
            (summary.margin - 33.266_666_666).abs() < 1e-6,
            "Expected ~33.27, got {}",
            summary.margin
        );
        assert_eq!(summary.cheapest_store, "eBay");
        assert_eq!(summary.priciest_store, "Amazon");
    }

    #[test]
    fn test_aggregate_single_store_zero_margin() {
        let result = make_result(&[("Amazon", "$42.00")]);

        let summary = ComparisonAggregator::aggregate(&result).unwrap();

        assert!((summary.margin - 0.0).abs() < f64::EPSILON);
        assert_eq!(summary.cheapest_store, "Amazon");
        assert_eq!(summary.priciest_store, "Amazon");
    }

    #[test]
    fn test_aggregate_ties_pick_first_store() {
        let result = make_result(&[("B", "$5"), ("A", "$5"), ("C", "$5")]);

        let summary = ComparisonAggregator::aggregate(&result).unwrap();

        // Iteration is by store name
        assert_eq!(summary.cheapest_store, "A");
        assert_eq!(summary.priciest_store, "A");
    }

    #[test]
    fn test_aggregate_zero_min_is_degenerate() {
        let result = make_result(&[("A", "$0.00"), ("B", "$5.00")]);

        let err = ComparisonAggregator::aggregate(&result).unwrap_err();

        assert!(matches!(err, PriceCompareError::DegenerateInput));
    }

    #[test]
    fn test_aggregate_empty_fails() {
        let err = ComparisonAggregator::aggregate(&ComparisonResult::new()).unwrap_err();

        assert!(matches!(err, PriceCompareError::EmptyResult));
    }

    #[test]
    fn test_aggregate_invalid_price_fails_fast() {
        let result = make_result(&[("Amazon", "$19.99"), ("eBay", "N/A"), ("Walmart", "$18")]);

        let err = ComparisonAggregator::aggregate(&result).unwrap_err();

        match err {
            PriceCompareError::InvalidPrice { store, price } => {
                assert_eq!(store, "eBay");
                assert_eq!(price, "N/A");
            }
            other => panic!("Expected InvalidPrice, got {:?}", other),
        }
    }

    #[test]
    fn test_aggregate_is_repeatable() {
        let result = make_result(&[("A", "$1,250.00"), ("B", "$1,000.00")]);

        let first = ComparisonAggregator::aggregate(&result).unwrap();
        let second = ComparisonAggregator::aggregate(&result).unwrap();

        assert_eq!(first, second);
        assert!((first.margin - 25.0).abs() < 1e-9);
    }
}

//! `pricecmp compare` subcommand

use chrono::{DateTime, Local};
use clap::Args;
use serde::Serialize;

use crate::config::Config;
use crate::services::{HttpPriceFetcher, SearchOutcome};
use crate::types::{ComparisonResult, MarginStatus, PriceSummary, SessionState};

/// Compare prices for one product
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Product name (multiple words are joined with spaces)
    #[arg(value_name = "QUERY", required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON report for one comparison
#[derive(Debug, Serialize)]
struct CompareReport<'a> {
    query: &'a str,
    fetched_at: Option<DateTime<Local>>,
    results: &'a ComparisonResult,
    summary: Option<&'a PriceSummary>,
    margin_error: Option<&'a str>,
}

impl CompareArgs {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let query = self.query.join(" ");
        let fetcher = HttpPriceFetcher::new(&config.api_url, config.timeout)?;
        let mut session = super::open_session(config);

        if session.start_search(&query, &fetcher)? == SearchOutcome::Failed {
            let message = session
                .state()
                .error_message()
                .unwrap_or("comparison failed")
                .to_string();
            anyhow::bail!(message);
        }

        let SessionState::Success(results) = session.state() else {
            anyhow::bail!("comparison did not complete");
        };
        let margin = session.margin();

        if self.json {
            let report = CompareReport {
                query: session.query(),
                fetched_at: session.fetched_at(),
                results,
                summary: margin.as_ref().and_then(MarginStatus::summary),
                margin_error: match &margin {
                    Some(MarginStatus::Unavailable(reason)) => Some(reason.as_str()),
                    _ => None,
                },
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", render_text(session.query(), results, margin.as_ref()));
        }
        Ok(())
    }
}

/// Plain-text table of quotes followed by the margin line
fn render_text(query: &str, results: &ComparisonResult, margin: Option<&MarginStatus>) -> String {
    let mut out = format!("Results for \"{}\"\n", query);
    if results.is_empty() {
        out.push_str("  No stores returned a price.\n");
        return out;
    }

    let cheapest = margin
        .and_then(MarginStatus::summary)
        .map(|s| s.cheapest_store.as_str());
    let store_width = results.stores().map(str::len).max().unwrap_or(0);
    let price_width = results.iter().map(|(_, q)| q.price.len()).max().unwrap_or(0);

    for (store, quote) in results {
        let marker = if Some(store.as_str()) == cheapest {
            "  <- best price"
        } else {
            ""
        };
        out.push_str(&format!(
            "  {:<sw$}  {:>pw$}  {}{}\n",
            store,
            quote.price,
            quote.url,
            marker,
            sw = store_width,
            pw = price_width,
        ));
    }

    // Margin is meaningless with a single store
    if results.len() > 1 {
        if let Some(margin) = margin {
            out.push_str(&format!("Estimated Profit Margin: {}\n", margin.display()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ComparisonAggregator;
    use crate::types::StoreQuote;

    fn make_result(prices: &[(&str, &str)]) -> ComparisonResult {
        prices
            .iter()
            .map(|(store, price)| {
                (
                    store.to_string(),
                    StoreQuote::new(*price, format!("https://{}.example", store)),
                )
            })
            .collect()
    }

    fn margin_of(result: &ComparisonResult) -> MarginStatus {
        match ComparisonAggregator::aggregate(result) {
            Ok(summary) => MarginStatus::Available(summary),
            Err(e) => MarginStatus::Unavailable(e.to_string()),
        }
    }

    #[test]
    fn test_render_text_marks_cheapest_and_margin() {
        let result = make_result(&[("Amazon", "$20.00"), ("eBay", "$10.00")]);
        let margin = margin_of(&result);

        let text = render_text("phone", &result, Some(&margin));

        assert!(text.starts_with("Results for \"phone\"\n"));
        let ebay_line = text.lines().find(|l| l.contains("eBay")).unwrap();
        assert!(ebay_line.ends_with("<- best price"));
        assert!(text.contains("Estimated Profit Margin: 100.00%"));
    }

    #[test]
    fn test_render_text_unavailable_margin() {
        let result = make_result(&[("Amazon", "$0.00"), ("eBay", "$10.00")]);
        let margin = margin_of(&result);

        let text = render_text("free", &result, Some(&margin));

        assert!(text.contains("Estimated Profit Margin: unavailable"));
        assert!(!text.contains("best price"));
    }

    #[test]
    fn test_render_text_single_store_hides_margin() {
        let result = make_result(&[("Walmart", "$5.00")]);
        let margin = margin_of(&result);

        let text = render_text("x", &result, Some(&margin));

        assert!(!text.contains("Profit Margin"));
    }

    #[test]
    fn test_render_text_empty_result() {
        let text = render_text("x", &ComparisonResult::new(), None);
        assert!(text.contains("No stores returned a price."));
    }
}

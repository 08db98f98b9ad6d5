//! Cost-of-living extraction
//!
//! Prices come from the configured cost-of-living source, one page per city.
//! Climate, safety, work and visa facts come from the country tables.

use super::{ExtractEnv, UniversityContext};
use crate::crawler::parser::{element_text, selector};
use crate::records::{generate_id, CostOfLiving, IdKind, APPROXIMATE_NOTE};
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use url::Url;

const MONTHLY_LABEL: &str = "Monthly costs for a single person";
const HOUSING_LABEL: &str = "Apartment (1 bedroom) in City Centre";
const TRANSPORT_LABEL: &str = "Monthly Pass";
const UTILITIES_LABEL: &str = "Electricity, Heating, Cooling, Water, Garbage";
const GROCERY_LABELS: &[&str] = &["Meal, Inexpensive Restaurant", "Milk", "Bread", "Rice", "Eggs", "Cheese"];

/// Grocery prices listed in the food column
const MAX_GROCERY_ITEMS: usize = 3;

static MONTHLY_AMOUNT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+\.\d+|\d{4,}").ok());

/// Prices read from a cost-of-living page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityPrices {
    pub monthly: Option<String>,
    pub housing: Option<String>,
    pub food: Option<String>,
    pub transport: Option<String>,
    pub utilities: Option<String>,
}

/// Identifier of a city's cost record
pub fn cost_id(city: &str, country: &str) -> String {
    generate_id(IdKind::CostOfLiving, &[city, country])
}

/// Cost page for a city: `<base>/<City-With-Hyphens>`
pub fn city_url(base: &str, city: &str) -> Option<Url> {
    let slug = city.split_whitespace().collect::<Vec<_>>().join("-");
    Url::parse(&format!("{}/{}", base.trim_end_matches('/'), slug)).ok()
}

/// Extracts living costs for the university's city
///
/// # Returns
///
/// Exactly one record; without a price page it is the placeholder built
/// from the country tables alone
pub async fn extract(env: &ExtractEnv, ctx: &UniversityContext) -> CostOfLiving {
    tracing::info!("Extracting cost of living for {}, {}", ctx.city, ctx.country);

    let Some(url) = city_url(&env.sources.cost_of_living_url, &ctx.city) else {
        return fallback(env, ctx);
    };

    let doc = match env.fetcher.fetch(url.as_str()).await {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!("No cost-of-living page for {}: {}", ctx.city, e);
            return fallback(env, ctx);
        }
    };

    let prices = parse_prices(&doc.body);
    env.cite(ctx, &format!("Cost of living in {}", ctx.city), &url);

    let mut record = base_record(env, ctx);
    record.monthly_estimate = prices.monthly;
    record.housing_costs = prices.housing;
    record.housing_type = record
        .housing_costs
        .as_ref()
        .map(|_| "Apartment (1 bedroom, city centre)".to_string());
    record.food = prices.food;
    record.transportation = prices.transport;
    record.utilities = prices.utilities;
    record
}

/// Record with the country-table facts only
fn base_record(env: &ExtractEnv, ctx: &UniversityContext) -> CostOfLiving {
    let mut record = CostOfLiving {
        cost_id: cost_id(&ctx.city, &ctx.country),
        univ_id: ctx.univ_id.clone(),
        city: ctx.city.clone(),
        country: ctx.country.clone(),
        currency: Some("USD".to_string()),
        student_services: Some(env.tables.student_services.to_string()),
        ..Default::default()
    };

    if let Some(profile) = env.tables.country(&ctx.country) {
        record.currency = Some(profile.currency.to_string());
        record.climate = Some(profile.climate_for(&ctx.city).to_string());
        record.safety_rating = Some(profile.safety.rating_for(&ctx.city).to_string());
        record.part_time_work = Some(profile.part_time_work.to_string());
        record.visa_cost = Some(profile.visa_cost.to_string());
        record.visa_process = Some(profile.visa_process.to_string());
    }

    record
}

/// Country-table facts without prices, marked approximate
pub fn fallback(env: &ExtractEnv, ctx: &UniversityContext) -> CostOfLiving {
    CostOfLiving {
        notes: APPROXIMATE_NOTE.to_string(),
        ..base_record(env, ctx)
    }
}

/// Reads the price tables of a cost-of-living page
pub fn parse_prices(html: &str) -> CityPrices {
    let document = Html::parse_document(html);

    let rows: Vec<(String, String)> = match selector("tr") {
        Some(sel) => document.select(&sel).filter_map(row_label_and_price).collect(),
        None => Vec::new(),
    };
    let price_of = |label: &str| {
        rows.iter()
            .find(|(row_label, _)| row_label.contains(label))
            .map(|(_, price)| price.clone())
    };

    let groceries: Vec<String> = rows
        .iter()
        .filter(|(label, _)| GROCERY_LABELS.iter().any(|g| label.contains(g)))
        .take(MAX_GROCERY_ITEMS)
        .map(|(label, price)| format!("{}: {}", label, price))
        .collect();

    CityPrices {
        monthly: monthly_estimate(&document),
        housing: price_of(HOUSING_LABEL),
        food: (!groceries.is_empty()).then(|| groceries.join("; ")),
        transport: price_of(TRANSPORT_LABEL),
        utilities: price_of(UTILITIES_LABEL),
    }
}

/// First cell as the label, second as the price
fn row_label_and_price(row: ElementRef<'_>) -> Option<(String, String)> {
    let sel = selector("td")?;
    let mut cells = row.select(&sel).map(element_text);
    let label = cells.next()?;
    let price = cells.next().filter(|p| !p.is_empty())?;
    Some((label, price))
}

/// Amount in the innermost block stating the single-person monthly cost
fn monthly_estimate(document: &Html) -> Option<String> {
    let sel = selector("div, p, span")?;
    let text = document
        .select(&sel)
        .map(element_text)
        .filter(|text| text.contains(MONTHLY_LABEL))
        .min_by_key(|text| text.len())?;
    MONTHLY_AMOUNT
        .as_ref()?
        .find(&text)
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COST_PAGE: &str = r#"<html><body>
        <div class="summary">
          <ul><li><span>Monthly costs for a single person are 1,048.5€ without rent.</span></li></ul>
        </div>
        <table class="data_wide_table">
          <tr><td>Meal, Inexpensive Restaurant</td><td>13.00 €</td></tr>
          <tr><td>Milk (regular), (1 liter)</td><td>0.95 €</td></tr>
          <tr><td>Bread for 2 people for 1 day</td><td>1.20 €</td></tr>
          <tr><td>Rice (white), (1kg)</td><td>1.30 €</td></tr>
          <tr><td>Monthly Pass (Regular Price)</td><td>54.60 €</td></tr>
          <tr><td>Basic (Electricity, Heating, Cooling, Water, Garbage) for 85m2 Apartment</td><td>120.42 €</td></tr>
          <tr><td>Apartment (1 bedroom) in City Centre</td><td>1,150.00 €</td></tr>
        </table>
    </body></html>"#;

    #[test]
    fn test_parse_prices() {
        let prices = parse_prices(COST_PAGE);
        assert_eq!(prices.monthly.as_deref(), Some("1,048.5"));
        assert_eq!(prices.housing.as_deref(), Some("1,150.00 €"));
        assert_eq!(prices.transport.as_deref(), Some("54.60 €"));
        assert_eq!(prices.utilities.as_deref(), Some("120.42 €"));
        assert_eq!(
            prices.food.as_deref(),
            Some("Meal, Inexpensive Restaurant: 13.00 €; Milk (regular), (1 liter): 0.95 €; Bread for 2 people for 1 day: 1.20 €")
        );
    }

    #[test]
    fn test_parse_prices_empty_page() {
        assert_eq!(parse_prices("<html><body>Not found</body></html>"), CityPrices::default());
    }

    #[test]
    fn test_city_url() {
        let url = city_url("https://costs.example/in/", "San Francisco").unwrap();
        assert_eq!(url.as_str(), "https://costs.example/in/San-Francisco");
    }

    #[test]
    fn test_cost_id_keys_on_city_and_country() {
        assert_eq!(cost_id("Madrid", "España"), cost_id("Madrid", "España"));
        assert_ne!(cost_id("Madrid", "España"), cost_id("Madrid", "México"));
        assert!(cost_id("Madrid", "España").starts_with("CST"));
    }
}

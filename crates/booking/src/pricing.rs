//! Price lookup keyed by (resource, option).

use std::collections::HashMap;

use common::Money;

use crate::configuration::{OptionConfiguration, ResourceConfiguration};
use crate::error::{BookingError, Result};

use OptionConfiguration as O;
use ResourceConfiguration as R;

/// Standard rental prices in minor units.
const STANDARD_PRICES: [(R, O, i64); 9] = [
    (R::Small, O::None, 15_000),
    (R::Small, O::Standard, 18_000),
    (R::Small, O::Premium, 21_000),
    (R::Medium, O::None, 20_000),
    (R::Medium, O::Standard, 23_500),
    (R::Medium, O::Premium, 27_000),
    (R::Large, O::None, 26_000),
    (R::Large, O::Standard, 30_000),
    (R::Large, O::Premium, 34_000),
];

/// Pure price lookup over the cross-product of the configuration sets.
///
/// There is no fallback price: a pair without an entry is an
/// `UnknownConfiguration` error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTable {
    prices: HashMap<(ResourceConfiguration, OptionConfiguration), Money>,
}

impl PriceTable {
    /// The table used in production.
    pub fn standard() -> Self {
        Self::from_entries(
            STANDARD_PRICES
                .iter()
                .map(|&(r, o, cents)| (r, o, Money::from_cents(cents))),
        )
    }

    /// Builds a table from explicit entries. Later entries replace earlier ones.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (ResourceConfiguration, OptionConfiguration, Money)>,
    ) -> Self {
        Self {
            prices: entries.into_iter().map(|(r, o, m)| ((r, o), m)).collect(),
        }
    }

    pub fn price(
        &self,
        resource: ResourceConfiguration,
        option: OptionConfiguration,
    ) -> Result<Money> {
        self.prices
            .get(&(resource, option))
            .copied()
            .ok_or_else(|| BookingError::UnknownConfiguration {
                resource: resource.to_string(),
                option: option.to_string(),
            })
    }

    /// True when every (resource, option) pair has a price.
    pub fn is_complete(&self) -> bool {
        R::ALL
            .iter()
            .all(|&r| O::ALL.iter().all(|&o| self.prices.contains_key(&(r, o))))
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::standard()
    }
}

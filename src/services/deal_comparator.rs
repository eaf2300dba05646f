use crate::{
    domain::{BestDeal, BestDeals, Comparison, KeyedCatalog, PriceCatalog, PriceParser, SlotIdentity},
    error::PriceParseError,
};

/// Picks the cheapest source for every product slot.
#[derive(Debug, Clone, Default)]
pub struct DealComparator {
    parser: PriceParser,
}

impl DealComparator {
    pub fn new(parser: PriceParser) -> Self {
        DealComparator { parser }
    }

    /// Compares catalogs slot by slot, where slot `n` is the n-th price
    /// scraped from each page.
    ///
    /// Pages are visited in catalog order and a later page only takes a slot
    /// with a strictly lower price, so ties go to the page listed first. One
    /// unparseable price fails the whole comparison.
    pub fn compare(&self, catalog: &PriceCatalog) -> Result<Comparison, PriceParseError> {
        if catalog.is_empty() {
            return Ok(Comparison::NoData);
        }

        let offers = catalog.iter().flat_map(|(url, prices)| {
            prices
                .iter()
                .enumerate()
                .map(move |(i, raw)| (SlotIdentity::at_index(i), url, raw.as_str()))
        });

        self.best_deals(offers).map(Comparison::Deals)
    }

    /// Same rules as [`DealComparator::compare`], with slots named by the
    /// caller's product keys instead of list positions.
    ///
    /// Library entry point only: the extractor scrapes price text without a
    /// product key, so the binary always compares by position.
    pub fn compare_keyed(&self, catalog: &KeyedCatalog) -> Result<Comparison, PriceParseError> {
        if catalog.is_empty() {
            return Ok(Comparison::NoData);
        }

        let offers = catalog.iter().flat_map(|(url, items)| {
            items
                .iter()
                .map(move |item| (SlotIdentity::Keyed(item.key.clone()), url, item.raw.as_str()))
        });

        self.best_deals(offers).map(Comparison::Deals)
    }

    fn best_deals<'a>(
        &self,
        offers: impl Iterator<Item = (SlotIdentity, &'a str, &'a str)>,
    ) -> Result<BestDeals, PriceParseError> {
        let mut best_deals = BestDeals::new();

        for (slot, url, raw) in offers {
            let price = self.parser.parse(url, raw)?;

            match best_deals.get_mut(&slot) {
                Some(best) => {
                    if price < best.price {
                        *best = BestDeal {
                            url: url.to_string(),
                            price,
                        };
                    }
                }
                None => {
                    best_deals.insert(
                        slot,
                        BestDeal {
                            url: url.to_string(),
                            price,
                        },
                    );
                }
            }
        }

        Ok(best_deals)
    }
}

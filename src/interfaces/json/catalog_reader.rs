use crate::domain::promotion::{
    CatalogCampaign, CatalogRuleset, PromotionEvent, catalog_to_promotion_event,
};
use crate::error::Result;
use serde::Deserialize;
use std::io::Read;

/// A catalog campaign together with the ruleset it applies.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub campaign: CatalogCampaign,
    pub ruleset: CatalogRuleset,
}

/// Reads a JSON array of catalog entries and translates each into a promotion event.
pub fn read_catalog<R: Read>(source: R) -> Result<Vec<PromotionEvent>> {
    let entries: Vec<CatalogEntry> = serde_json::from_reader(source)?;
    entries
        .iter()
        .map(|entry| catalog_to_promotion_event(&entry.campaign, &entry.ruleset))
        .collect()
}

use crate::error::{PostprocessError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Event type codes whose promotions carry a fee rate.
pub const FEE_ELIGIBLE_EVENT_TYPES: [&str; 3] = ["01", "02", "03"];

/// Campaign type prefix of offer numbers generated from catalog campaigns.
pub const CATALOG_CAMPAIGN_TYPE: u8 = 1;

const CATALOG_IN_USER_ID: &str = "mslv2.0";

/// A promotion as seen by the fee calculator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromotionEvent {
    pub offer_no: String,
    pub event_type_code: String,
    pub fee_rate: Decimal,
    pub brand_code: String,
    pub shop_code: String,
    pub event_name: String,
    pub event_description: String,
    pub sale_base_amt: Decimal,
    pub discount_base_amt: Decimal,
    pub discount_rate: Decimal,
    pub normal_sale_recognition_chk: bool,
    pub approval_chk: i32,
    pub in_user_id: String,
    pub staff_sale_chk: bool,
}

impl PromotionEvent {
    pub fn is_fee_eligible(&self) -> bool {
        FEE_ELIGIBLE_EVENT_TYPES.contains(&self.event_type_code.as_str())
    }

    pub fn has_positive_fee_rate(&self) -> bool {
        self.fee_rate > Decimal::ZERO
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferType {
    Brand,
    Member,
    Channel,
}

impl OfferType {
    pub fn event_type_code(self) -> &'static str {
        match self {
            OfferType::Brand => "01",
            OfferType::Member => "02",
            OfferType::Channel => "03",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    ToFixedPrice,
    ByFixedPrice,
    ToPercentage,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogAction {
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelCondition {
    pub brand_code: Option<String>,
    pub store_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogCampaign {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub desc: String,
    pub fee_rate: Decimal,
    /// Staff-only sale.
    pub is_staff: bool,
    pub channels: Vec<ChannelCondition>,
    pub ruleset_id: i64,
    pub enable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRuleset {
    pub id: i64,
    #[serde(default)]
    pub template_code: String,
    #[serde(rename = "type")]
    pub offer_type: OfferType,
    #[serde(default)]
    pub exclusive: bool,
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub name: String,
    pub action: CatalogAction,
}

/// Builds the external offer number `"{campaignType}-{campaignId}-{rulesetId}"`.
pub fn catalog_offer_no(campaign_id: i64, ruleset_id: i64) -> String {
    format!("{CATALOG_CAMPAIGN_TYPE}-{campaign_id}-{ruleset_id}")
}

/// Translates a catalog campaign and its ruleset into a promotion event.
pub fn catalog_to_promotion_event(
    campaign: &CatalogCampaign,
    ruleset: &CatalogRuleset,
) -> Result<PromotionEvent> {
    // zero means the campaign did not name its ruleset
    if campaign.ruleset_id != 0 && campaign.ruleset_id != ruleset.id {
        return Err(PostprocessError::Catalog(format!(
            "campaign {} applies ruleset {}, not {}",
            campaign.id, campaign.ruleset_id, ruleset.id
        )));
    }

    let channel = campaign
        .channels
        .iter()
        .find(|c| c.brand_code.as_deref().is_some_and(|b| !b.is_empty()))
        .ok_or_else(|| PostprocessError::Catalog("brand is not exist".to_string()))?;

    let brand_code = channel.brand_code.clone().unwrap_or_default();
    let shop_code = channel.store_code.clone().unwrap_or_default();

    let mut event = PromotionEvent {
        offer_no: catalog_offer_no(campaign.id, ruleset.id),
        event_type_code: ruleset.offer_type.event_type_code().to_string(),
        fee_rate: campaign.fee_rate,
        brand_code,
        shop_code,
        event_name: campaign.name.clone(),
        event_description: campaign.desc.clone(),
        approval_chk: 1,
        in_user_id: CATALOG_IN_USER_ID.to_string(),
        staff_sale_chk: campaign.is_staff,
        ..Default::default()
    };
    apply_discount(&mut event, ruleset.action);

    Ok(event)
}

fn apply_discount(event: &mut PromotionEvent, action: CatalogAction) {
    match action.discount_type {
        DiscountType::ToPercentage => event.discount_rate = action.discount_value,
        DiscountType::ByFixedPrice => event.discount_base_amt = action.discount_value,
        DiscountType::ToFixedPrice => event.sale_base_amt = action.discount_value,
    }
    event.normal_sale_recognition_chk = action.discount_value.is_zero();
}

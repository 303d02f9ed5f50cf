use crate::domain::fee::{
    FeePolicy, OfferResolution, PostFailCreateSaleFee, PostSaleRecordFee, ResolvedOffer,
    allocate_fees,
};
use crate::domain::ports::{FeeFailMarkerStoreBox, PromotionLookupBox, SaleRecordFeeStoreBox};
use crate::domain::sale_record::SaleRecordEvent;
use crate::error::{PostprocessError, Result};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum FeeOutcome {
    /// One row per line item was persisted.
    Allocated(Vec<PostSaleRecordFee>),
    /// Rows for this transaction already exist.
    AlreadyAllocated,
    /// The first eligible promotion had no usable fee rate; nothing was
    /// allocated and a fail marker is on record.
    Deferred(PostFailCreateSaleFee),
}

enum Resolution {
    Resolved(Vec<ResolvedOffer>),
    ZeroRate(ResolvedOffer),
}

/// Allocates transaction fees to line items from promotion and item fee rates.
pub struct FeeHandler {
    promotions: PromotionLookupBox,
    fees: SaleRecordFeeStoreBox,
    fail_markers: FeeFailMarkerStoreBox,
    policy: FeePolicy,
}

impl FeeHandler {
    pub fn new(
        promotions: PromotionLookupBox,
        fees: SaleRecordFeeStoreBox,
        fail_markers: FeeFailMarkerStoreBox,
        policy: FeePolicy,
    ) -> Self {
        Self {
            promotions,
            fees,
            fail_markers,
            policy,
        }
    }

    pub async fn allocated(&self) -> Result<Vec<PostSaleRecordFee>> {
        self.fees.get_all().await
    }

    pub async fn fail_markers(&self) -> Result<Vec<PostFailCreateSaleFee>> {
        self.fail_markers.get_all().await
    }

    pub async fn handle(&self, event: &SaleRecordEvent) -> Result<FeeOutcome> {
        if self.fees.exists(event.transaction_id).await? {
            info!(
                transaction_id = event.transaction_id,
                "fees already allocated for transaction"
            );
            return Ok(FeeOutcome::AlreadyAllocated);
        }

        let resolved = match self.resolve_offers(event).await? {
            Resolution::Resolved(resolved) => resolved,
            Resolution::ZeroRate(zero) => return self.defer(event, &zero).await,
        };

        let rows = allocate_fees(event, &resolved, self.policy.rounding);
        self.fees.save_all(rows.clone()).await?;
        info!(
            transaction_id = event.transaction_id,
            rows = rows.len(),
            promotions = resolved.len(),
            "fees allocated"
        );
        Ok(FeeOutcome::Allocated(rows))
    }

    /// Resolves fee-rate candidate offers against the promotion catalog.
    async fn resolve_offers(&self, event: &SaleRecordEvent) -> Result<Resolution> {
        let mut resolved = Vec::new();

        for offer in event
            .cart_offers
            .iter()
            .filter(|o| o.is_fee_rate_candidate())
        {
            let promotion = self.promotions.get_by_no(&offer.offer_no).await?;
            if !promotion.is_fee_eligible() {
                debug!(
                    offer_no = %offer.offer_no,
                    event_type_code = %promotion.event_type_code,
                    "promotion type carries no fee rate"
                );
                continue;
            }

            match self.policy.resolution {
                OfferResolution::MultiOffer => {
                    if !promotion.has_positive_fee_rate() {
                        return Err(PostprocessError::ZeroFeeRate {
                            offer_no: promotion.offer_no,
                        });
                    }
                    resolved.push(ResolvedOffer {
                        offer: offer.clone(),
                        promotion,
                    });
                }
                OfferResolution::FirstMatch => {
                    let pair = ResolvedOffer {
                        offer: offer.clone(),
                        promotion,
                    };
                    if !pair.promotion.has_positive_fee_rate() {
                        return Ok(Resolution::ZeroRate(pair));
                    }
                    resolved.push(pair);
                    break;
                }
            }
        }

        Ok(Resolution::Resolved(resolved))
    }

    async fn defer(&self, event: &SaleRecordEvent, zero: &ResolvedOffer) -> Result<FeeOutcome> {
        if let Some(existing) = self.fail_markers.get(event.transaction_id).await? {
            debug!(
                transaction_id = event.transaction_id,
                "fee fail marker already recorded"
            );
            return Ok(FeeOutcome::Deferred(existing));
        }

        let marker = PostFailCreateSaleFee::new(event, &zero.promotion);
        self.fail_markers.save(marker.clone()).await?;
        warn!(
            transaction_id = event.transaction_id,
            offer_no = %marker.offer_no,
            fee_rate = %marker.fee_rate,
            "activity fee rate is not positive, fee allocation deferred"
        );
        Ok(FeeOutcome::Deferred(marker))
    }
}

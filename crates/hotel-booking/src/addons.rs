//! # Addon Sync
//!
//! Replacing a booking's addon selection. Lines are re-priced at the current
//! catalog price, the booking's totals are recomputed from its fixed room
//! subtotal, and lines plus totals are written in one transaction.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use hotel_core::lifecycle::ensure_modifiable;
use hotel_core::validation::validate_quantity;
use hotel_core::{AddonRequest, Booking, Money, PricingEngine};
use hotel_db::{Database, DbError, PricedAddonLine};

use crate::error::{BookingError, BookingResult};

#[derive(Debug, Clone)]
pub struct AddonSyncCoordinator {
    db: Database,
    pricing: PricingEngine,
}

impl AddonSyncCoordinator {
    pub fn new(db: Database, pricing: PricingEngine) -> Self {
        AddonSyncCoordinator { db, pricing }
    }

    /// Replaces every addon line of `booking_id` with `requests`.
    ///
    /// An empty `requests` clears the addons. Nothing changes on any error.
    pub async fn replace_addons(
        &self,
        booking_id: &str,
        requests: &[AddonRequest],
        now: DateTime<Utc>,
    ) -> BookingResult<Booking> {
        let booking = self
            .db
            .bookings()
            .get_by_id(booking_id)
            .await?
            .ok_or_else(|| BookingError::not_found(format!("booking {booking_id} not found")))?;

        ensure_modifiable(&booking)?;

        let (lines, addon_subtotal) = price_addon_lines(&self.db, &self.pricing, requests).await?;
        let breakdown = self.pricing.breakdown(booking.room_subtotal(), addon_subtotal)?;

        let updated = self
            .db
            .bookings()
            .replace_addons(booking_id, &lines, &breakdown, now)
            .await
            .map_err(|e| match e {
                DbError::Conflict(_) => BookingError::validation(format!(
                    "booking {booking_id} is closed and its addons cannot be changed"
                )),
                other => other.into(),
            })?;

        info!(
            booking_id = %booking_id,
            lines = updated.addons.len(),
            total = %breakdown.total,
            "Booking addons replaced"
        );

        Ok(updated)
    }
}

/// Looks up every requested addon and prices it at the current catalog price.
///
/// Returns the lines in request order and their subtotal. Any unknown addon
/// fails the whole request with `NotFound`.
pub(crate) async fn price_addon_lines(
    db: &Database,
    pricing: &PricingEngine,
    requests: &[AddonRequest],
) -> BookingResult<(Vec<PricedAddonLine>, Money)> {
    for request in requests {
        validate_quantity(request.quantity)?;
    }

    let ids: Vec<String> = requests.iter().map(|r| r.addon_id.clone()).collect();
    let catalog = db.addons().get_many(&ids).await?;

    let mut lines = Vec::with_capacity(requests.len());
    for request in requests {
        let addon = catalog.get(&request.addon_id).ok_or_else(|| {
            warn!(addon_id = %request.addon_id, "Unknown addon requested");
            BookingError::not_found(format!("addon {} not found", request.addon_id))
        })?;

        lines.push(PricedAddonLine {
            addon_id: addon.id.clone(),
            addon_name: addon.name.clone(),
            quantity: request.quantity,
            price_at_booking_cents: addon.price_cents,
        });
    }

    let subtotal = pricing.addon_subtotal(
        lines
            .iter()
            .map(|line| (Money::from_cents(line.price_at_booking_cents), line.quantity)),
    )?;

    Ok((lines, subtotal))
}

//! # Booking Notifications
//!
//! Confirmation messages are best-effort: they are dispatched on a detached
//! task after the booking is durable, and a failure is logged, never returned.
//!
//! ```text
//! create / confirm ── commit ──► Ok(booking) to caller
//!                       │
//!                       └─ tokio::spawn ──► load BookingDetail
//!                                              │
//!                                              ▼
//!                                   Notifier::send_booking_confirmation
//!                                              │
//!                                   Err ──► error! log, dropped
//! ```

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use hotel_core::{BookingDetail, Money, CURRENCY_CODE};
use hotel_db::Database;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Delivers booking confirmations (email, chat, ...).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_booking_confirmation(&self, detail: &BookingDetail) -> Result<(), NotifyError>;
}

/// Writes the rendered confirmation to the log. Used where no mail transport
/// is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_booking_confirmation(&self, detail: &BookingDetail) -> Result<(), NotifyError> {
        let body = render_confirmation(detail);
        info!(
            booking_id = %detail.booking.id,
            to = %detail.user_email,
            "Booking confirmation\n{}",
            body
        );
        Ok(())
    }
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn send_booking_confirmation(&self, _detail: &BookingDetail) -> Result<(), NotifyError> {
        Ok(())
    }
}

const RULE: &str = "----------------------------------------";

/// Renders the plain-text confirmation message for a booking.
pub fn render_confirmation(detail: &BookingDetail) -> String {
    let booking = &detail.booking;
    let status = booking.status.as_str().to_uppercase();
    let money = |amount: Money| format!("{CURRENCY_CODE} {amount}");

    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "Subject: Booking Confirmation #{} - {}", booking.id, status);
    let _ = writeln!(out);
    let _ = writeln!(out, "Dear {},", detail.username);
    let _ = writeln!(out);
    let _ = writeln!(out, "Thank you for choosing our hotel!");
    let _ = writeln!(out, "Here are your booking details:");
    let _ = writeln!(out);
    let _ = writeln!(out, "Booking ID:  #{}", booking.id);
    let _ = writeln!(out, "Status:      {}", status);
    let _ = writeln!(out, "Room Type:   {}", detail.room_type_name);
    let _ = writeln!(out, "Rate Plan:   {}", detail.rate_plan_name);
    let _ = writeln!(out, "Check-in:    {}", booking.check_in_date.format("%d %b %Y"));
    let _ = writeln!(out, "Check-out:   {}", booking.check_out_date.format("%d %b %Y"));
    let _ = writeln!(out, "Guests:      {} Adults", booking.num_adults);
    if !detail.room_number.is_empty() {
        let _ = writeln!(out, "Room Number: {}", detail.room_number);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "PRICE BREAKDOWN");
    let _ = writeln!(out, "{RULE}");

    let breakdown = booking.breakdown();
    let _ = writeln!(out, "Room Charge:    {}", money(breakdown.room_subtotal));

    if !booking.addons.is_empty() {
        let _ = writeln!(out, "Add-ons:");
        for line in &booking.addons {
            let _ = writeln!(
                out,
                "- {} (x{}): {}",
                line.addon_name,
                line.quantity,
                money(line.line_total())
            );
        }
        let _ = writeln!(out, "Addon Subtotal: {}", money(breakdown.addon_subtotal));
    }

    let _ = writeln!(out, "Taxes:          {}", money(breakdown.taxes));
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "TOTAL PRICE:    {}", money(breakdown.total));
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out);
    let _ = writeln!(out, "We look forward to welcoming you!");

    out
}

/// Sends a confirmation for `booking_id` on a detached task.
///
/// The returned handle may be awaited (tests) or dropped (request paths).
pub(crate) fn dispatch_confirmation(
    db: Database,
    notifier: Arc<dyn Notifier>,
    booking_id: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let detail = match db.bookings().get_detail(&booking_id).await {
            Ok(Some(detail)) => detail,
            Ok(None) => {
                error!(booking_id = %booking_id, "Booking vanished before confirmation was sent");
                return;
            }
            Err(e) => {
                error!(?e, booking_id = %booking_id, "Failed to load booking for confirmation");
                return;
            }
        };

        match notifier.send_booking_confirmation(&detail).await {
            Ok(()) => debug!(booking_id = %booking_id, "Confirmation sent"),
            Err(e) => error!(?e, booking_id = %booking_id, "Failed to send booking confirmation"),
        }
    })
}

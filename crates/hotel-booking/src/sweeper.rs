//! # Expiration Sweeper
//!
//! Periodically cancels pending bookings whose hold has run out, returning
//! their rooms to inventory.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  every interval_secs:                                                   │
//! │                                                                         │
//! │    UPDATE bookings SET status = 'cancelled'                             │
//! │     WHERE status = 'pending' AND expired_at < now                       │
//! │                                                                         │
//! │  • one statement, so a confirm racing the sweep either lands first      │
//! │    (row no longer pending) or fails its status compare-and-swap         │
//! │  • a failed tick is logged and the next tick retries                    │
//! │  • shutdown via ExpirationSweeperHandle                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use hotel_db::Database;

use crate::error::{BookingError, BookingResult};

/// Cancels expired holds on an interval.
pub struct ExpirationSweeper {
    db: Database,
    interval: Duration,
    shutdown_rx: mpsc::Receiver<()>,
}

/// Handle for stopping a running sweeper.
#[derive(Clone)]
pub struct ExpirationSweeperHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl ExpirationSweeperHandle {
    /// Triggers graceful shutdown.
    pub async fn shutdown(&self) -> BookingResult<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| BookingError::unexpected("sweeper already stopped"))
    }
}

impl ExpirationSweeper {
    pub fn new(db: Database, interval: Duration) -> (Self, ExpirationSweeperHandle) {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let sweeper = ExpirationSweeper {
            db,
            interval,
            shutdown_rx,
        };

        (sweeper, ExpirationSweeperHandle { shutdown_tx })
    }

    /// Runs the sweep loop until shut down. Spawn as a background task.
    pub async fn run(mut self) {
        info!(interval_secs = self.interval.as_secs_f64(), "Expiration sweeper starting");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.sweep_once(Utc::now()).await {
                        error!(?e, "Failed to sweep expired bookings");
                    }
                }

                _ = self.shutdown_rx.recv() => {
                    info!("Expiration sweeper shutting down");
                    break;
                }
            }
        }

        info!("Expiration sweeper stopped");
    }

    /// Cancels every pending booking whose hold expired before `now`.
    ///
    /// Returns how many bookings were cancelled.
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> BookingResult<u64> {
        let cancelled = self.db.bookings().cancel_expired(now).await?;

        if cancelled.is_empty() {
            debug!("No expired holds");
        } else {
            info!(count = cancelled.len(), ids = ?cancelled, "Cancelled expired holds");
        }

        Ok(cancelled.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Catalog;
    use chrono::Duration as ChronoDuration;
    use hotel_core::BookingStatus;

    #[tokio::test]
    async fn test_sweep_once_cancels_only_expired_pending() {
        let catalog = Catalog::seed(2).await;
        let t = Utc::now();

        let held = catalog
            .create(&catalog.request("2024-01-10", "2024-01-12", vec![]), t)
            .await
            .unwrap();
        let paid = catalog
            .create(&catalog.request("2024-01-10", "2024-01-12", vec![]), t)
            .await
            .unwrap();
        catalog.lifecycle().confirm_payment(&paid.id, t).await.unwrap();

        let (sweeper, _handle) = ExpirationSweeper::new(catalog.db.clone(), Duration::from_secs(60));

        assert_eq!(sweeper.sweep_once(t + ChronoDuration::minutes(29)).await.unwrap(), 0);
        assert_eq!(sweeper.sweep_once(t + ChronoDuration::minutes(31)).await.unwrap(), 1);
        assert_eq!(sweeper.sweep_once(t + ChronoDuration::minutes(32)).await.unwrap(), 0);

        let lifecycle = catalog.lifecycle();
        assert_eq!(
            lifecycle.get_booking(&held.id).await.unwrap().status,
            BookingStatus::Cancelled
        );
        assert_eq!(
            lifecycle.get_booking(&paid.id).await.unwrap().status,
            BookingStatus::Confirmed
        );

        // The released room can be booked again.
        catalog
            .create(
                &catalog.request("2024-01-10", "2024-01-12", vec![]),
                t + ChronoDuration::minutes(32),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_loop_sweeps_and_shuts_down() {
        let catalog = Catalog::seed(1).await;
        let booking = catalog
            .create(
                &catalog.request("2024-01-10", "2024-01-12", vec![]),
                Utc::now() - ChronoDuration::minutes(31),
            )
            .await
            .unwrap();

        let (sweeper, handle) =
            ExpirationSweeper::new(catalog.db.clone(), Duration::from_millis(20));
        let task = tokio::spawn(sweeper.run());

        let lifecycle = catalog.lifecycle();
        let mut status = BookingStatus::Pending;
        for _ in 0..100 {
            status = lifecycle.get_booking(&booking.id).await.unwrap().status;
            if status == BookingStatus::Cancelled {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(status, BookingStatus::Cancelled);

        handle.shutdown().await.unwrap();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();

        assert!(handle.shutdown().await.is_err());
    }
}

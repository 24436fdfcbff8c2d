//! Shared fixture for the engine's tests: a small seeded hotel.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use hotel_core::{
    Addon, AddonCategory, AddonRequest, Booking, Money, NewBooking, PricingEngine, RatePlan, Room,
    RoomType, StayDates, User,
};
use hotel_db::{Database, DbConfig};

use crate::error::BookingResult;
use crate::lifecycle::BookingLifecycle;
use crate::notifier::{NoOpNotifier, Notifier};

/// One user, a "Standard" plan priced at 1000.00/night for Deluxe and
/// 2500.00/night for Suite, an unpriced plan, `n` Deluxe rooms numbered
/// from 101, no Suite rooms, and a 350.00 breakfast addon.
pub(crate) struct Catalog {
    pub db: Database,
    pub user: User,
    pub plan: RatePlan,
    pub unpriced_plan: RatePlan,
    pub deluxe: RoomType,
    pub suite: RoomType,
    pub rooms: Vec<Room>,
    pub breakfast: Addon,
}

impl Catalog {
    pub async fn seed(deluxe_rooms: usize) -> Catalog {
        Catalog::seed_with(DbConfig::in_memory(), deluxe_rooms).await
    }

    pub async fn seed_with(config: DbConfig, deluxe_rooms: usize) -> Catalog {
        let db = Database::new(config).await.unwrap();

        let user = User::new("alice", "alice@example.com");
        db.users().insert(&user).await.unwrap();

        let plan = RatePlan::new("Standard").with_policies(false, true, true);
        let unpriced_plan = RatePlan::new("Honeymoon").with_policies(true, false, false);
        db.rate_plans().insert(&plan).await.unwrap();
        db.rate_plans().insert(&unpriced_plan).await.unwrap();

        let deluxe = RoomType::new("Deluxe", 2).with_bed_type("King");
        let suite = RoomType::new("Suite", 4).with_bed_type("King");
        db.rooms().insert_room_type(&deluxe).await.unwrap();
        db.rooms().insert_room_type(&suite).await.unwrap();

        db.rate_plans()
            .set_price(&deluxe.id, &plan.id, Money::from_cents(100_000))
            .await
            .unwrap();
        db.rate_plans()
            .set_price(&suite.id, &plan.id, Money::from_cents(250_000))
            .await
            .unwrap();

        let mut rooms = Vec::with_capacity(deluxe_rooms);
        for i in 0..deluxe_rooms {
            let room = Room::new(&deluxe.id, format!("{}", 101 + i));
            db.rooms().insert_room(&room).await.unwrap();
            rooms.push(room);
        }

        let dining = AddonCategory::new("Dining");
        db.addons().insert_category(&dining).await.unwrap();
        let breakfast = Addon::new(&dining.id, "Breakfast Buffet", Money::from_cents(35_000))
            .with_unit_name("person");
        db.addons().insert(&breakfast).await.unwrap();

        Catalog {
            db,
            user,
            plan,
            unpriced_plan,
            deluxe,
            suite,
            rooms,
            breakfast,
        }
    }

    pub fn stay(check_in: &str, check_out: &str) -> StayDates {
        StayDates::parse(check_in, check_out).unwrap()
    }

    /// A two-adult Deluxe request under the Standard plan.
    pub fn request(&self, check_in: &str, check_out: &str, addons: Vec<AddonRequest>) -> NewBooking {
        NewBooking {
            user_id: self.user.id.clone(),
            rate_plan_id: self.plan.id.clone(),
            room_type_id: self.deluxe.id.clone(),
            check_in: date(check_in),
            check_out: date(check_out),
            num_adults: 2,
            addons,
        }
    }

    pub fn lifecycle(&self) -> BookingLifecycle {
        self.lifecycle_with(Arc::new(NoOpNotifier))
    }

    pub fn lifecycle_with(&self, notifier: Arc<dyn Notifier>) -> BookingLifecycle {
        BookingLifecycle::new(
            self.db.clone(),
            PricingEngine::default(),
            Duration::minutes(30),
            notifier,
        )
    }

    pub async fn create(&self, request: &NewBooking, now: DateTime<Utc>) -> BookingResult<Booking> {
        self.lifecycle().create(request, now).await
    }
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

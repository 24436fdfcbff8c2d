//! # Repository Module
//!
//! Database repository implementations for the booking engine.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BookingEngine                                                          │
//! │       │                                                                 │
//! │       │  db.bookings().create_with_claim(&record)                       │
//! │       ▼                                                                 │
//! │  BookingRepository                                                      │
//! │  ├── create_with_claim(&self, record)   claim + insert, one tx          │
//! │  ├── update_status(&self, id, from, to) compare-and-swap                │
//! │  ├── replace_addons(&self, id, ...)     lines + totals, one tx          │
//! │  └── cancel_expired(&self, now)         bulk sweep                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every check-then-write the engine needs is expressed as a single
//! conditional statement (`INSERT ... SELECT ... WHERE`, `UPDATE ... WHERE
//! status = ?`), so SQLite's write lock makes it atomic.
//!
//! ## Available Repositories
//!
//! - [`BookingRepository`](booking::BookingRepository) - Bookings and their addon lines
//! - [`RoomRepository`](room::RoomRepository) - Room types, rooms, blocks, availability
//! - [`RatePlanRepository`](rate_plan::RatePlanRepository) - Rate plans and nightly prices
//! - [`AddonRepository`](addon::AddonRepository) - Addon categories and addons
//! - [`UserRepository`](user::UserRepository) - Booking owners

pub mod addon;
pub mod booking;
pub mod rate_plan;
pub mod room;
pub mod user;

//! # hotel-db: Database Layer for the Booking Engine
//!
//! This crate provides database access for the booking engine.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Booking Engine Data Flow                         │
//! │                                                                         │
//! │  BookingEngine::create_booking(...)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     hotel-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ BookingRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ RoomRepo      │    │ 001_initial  │  │   │
//! │  │   │ WAL, FKs,     │    │ RatePlanRepo  │    │   _schema    │  │   │
//! │  │   │ busy timeout  │    │ AddonRepo     │    │              │  │   │
//! │  │   └───────────────┘    │ UserRepo      │    └──────────────┘  │   │
//! │  │                        └───────────────┘                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (hotel.db)                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - One repository per aggregate
//! - [`error`] - Database error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::addon::AddonRepository;
pub use repository::booking::{BookingRepository, NewBookingRecord, PricedAddonLine};
pub use repository::rate_plan::RatePlanRepository;
pub use repository::room::RoomRepository;
pub use repository::user::UserRepository;

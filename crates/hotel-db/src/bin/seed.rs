//! # Seed Data Generator
//!
//! Populates the database with a small hotel catalog for development.
//!
//! ## Usage
//! ```bash
//! # Three room types, 10 rooms each (default)
//! cargo run -p hotel-db --bin seed
//!
//! # More rooms per type
//! cargo run -p hotel-db --bin seed -- --rooms 25
//!
//! # Specify database path
//! cargo run -p hotel-db --bin seed -- --db ./data/hotel.db
//! ```
//!
//! ## Generated Catalog
//! - Room types: Standard, Deluxe, Suite, with pictures and amenities
//! - Rooms numbered `{floor}{nn}`: Standard on floor 1, Deluxe on 2, Suite on 3
//! - Rate plans: Room Only, Bed & Breakfast, Flexible
//! - A nightly price for every room type × rate plan
//! - Addons: breakfast, dinner, airport transfer, spa
//! - One demo user

use std::env;

use hotel_core::{
    Addon, AddonCategory, Amenity, Money, RatePlan, Room, RoomType, User,
};
use hotel_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

/// (name, capacity, size m², bed, base nightly price in cents, amenities)
const ROOM_TYPES: &[(&str, i64, f64, &str, i64, &[&str])] = &[
    ("Standard", 2, 24.0, "Queen", 150_000, &["Wi-Fi", "Air conditioning"]),
    ("Deluxe", 2, 32.0, "King", 100_000, &["Wi-Fi", "Air conditioning", "Bathtub", "City view"]),
    ("Suite", 4, 58.0, "2 King", 400_000, &["Wi-Fi", "Air conditioning", "Bathtub", "Kitchenette", "Sea view"]),
];

/// (name, description, special package, free cancel, pay later, price markup in bps)
const RATE_PLANS: &[(&str, &str, bool, bool, bool, i64)] = &[
    ("Room Only", "Best available rate, non-refundable", false, false, false, 0),
    ("Bed & Breakfast", "Daily breakfast for two", true, false, false, 2_000),
    ("Flexible", "Free cancellation, pay at the hotel", false, true, true, 1_500),
];

/// (category, name, price in cents, unit)
const ADDONS: &[(&str, &str, i64, &str)] = &[
    ("Food & Beverage", "Breakfast Buffet", 35_000, "person"),
    ("Food & Beverage", "Set Dinner", 80_000, "person"),
    ("Transport", "Airport Transfer", 120_000, "trip"),
    ("Wellness", "Thai Massage (60 min)", 150_000, "session"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut rooms_per_type: usize = 10;
    let mut db_path = String::from("./hotel.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--rooms" | "-r" => {
                if i + 1 < args.len() {
                    rooms_per_type = args[i + 1].parse().unwrap_or(10).clamp(1, 99);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Hotel Booking Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -r, --rooms <N>    Rooms per room type, 1-99 (default: 10)");
                println!("  -d, --db <PATH>    Database file path (default: ./hotel.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Hotel Booking Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!("Rooms per type: {}", rooms_per_type);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.rooms().list_room_types().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} room types", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Amenities (deduplicated across room types)
    let mut amenities: Vec<Amenity> = Vec::new();
    for (_, _, _, _, _, names) in ROOM_TYPES {
        for name in names.iter() {
            if !amenities.iter().any(|a| a.name == *name) {
                let amenity = Amenity::new(*name);
                db.rooms().insert_amenity(&amenity).await?;
                amenities.push(amenity);
            }
        }
    }

    // Rate plans
    let mut plans = Vec::new();
    for (name, description, special, free_cancel, pay_later, markup_bps) in RATE_PLANS {
        let plan = RatePlan::new(*name)
            .with_description(*description)
            .with_policies(*special, *free_cancel, *pay_later);
        db.rate_plans().insert(&plan).await?;
        plans.push((plan, *markup_bps));
    }
    println!("✓ {} rate plans", plans.len());

    // Room types, rooms and prices
    let mut room_count = 0;
    for (floor, (name, capacity, size, bed, base_price, amenity_names)) in
        ROOM_TYPES.iter().enumerate()
    {
        let room_type = RoomType::new(*name, *capacity)
            .with_description(format!("{name} room, {size} m²"))
            .with_size_sqm(*size)
            .with_bed_type(*bed);
        db.rooms().insert_room_type(&room_type).await?;

        let slug = name.to_lowercase();
        db.rooms()
            .set_pictures(
                &room_type.id,
                &[format!("/images/{slug}-1.jpg"), format!("/images/{slug}-2.jpg")],
            )
            .await?;

        let amenity_ids: Vec<String> = amenities
            .iter()
            .filter(|a| amenity_names.contains(&a.name.as_str()))
            .map(|a| a.id.clone())
            .collect();
        db.rooms().set_amenities(&room_type.id, &amenity_ids).await?;

        for n in 1..=rooms_per_type {
            let room = Room::new(&room_type.id, format!("{}{:02}", floor + 1, n));
            if let Err(e) = db.rooms().insert_room(&room).await {
                eprintln!("Failed to insert room {}: {}", room.room_number, e);
                continue;
            }
            room_count += 1;
        }

        for (plan, markup_bps) in &plans {
            let nightly = Money::from_cents(base_price + base_price * markup_bps / 10_000);
            db.rate_plans().set_price(&room_type.id, &plan.id, nightly).await?;
        }

        println!("✓ {} ({} rooms)", name, rooms_per_type);
    }

    // Addons
    let mut categories: Vec<AddonCategory> = Vec::new();
    for (category_name, name, price, unit) in ADDONS {
        let category = match categories.iter().find(|c| c.name == *category_name) {
            Some(category) => category.clone(),
            None => {
                let category = AddonCategory::new(*category_name);
                db.addons().insert_category(&category).await?;
                categories.push(category.clone());
                category
            }
        };

        let addon = Addon::new(&category.id, *name, Money::from_cents(*price)).with_unit_name(*unit);
        db.addons().insert(&addon).await?;
    }
    println!("✓ {} addons in {} categories", ADDONS.len(), categories.len());

    let demo = User::new("demo", "demo@example.com");
    db.users().insert(&demo).await?;

    println!();
    println!("✓ Seed complete! {} rooms, demo user id: {}", room_count, demo.id);

    Ok(())
}

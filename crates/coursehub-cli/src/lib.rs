//! # Coursehub CLI
//!
//! Database seeding utilities for Coursehub testing and development.
//!
//! Seeded rows are tagged so they can be removed again without touching real
//! data: users get an `@seed.example.com` address and courses a thumbnail
//! under [`seeder::SEED_IMAGE_PREFIX`].
//!
//! ## Usage
//!
//! ```ignore
//! use coursehub_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(20).with_users(50);
//! seed_all(&pool, config).await?;
//! ```

pub mod seeder;

//! Sun, moon and planet positions, sky color and scene lighting for an observer on the
//! Earth, published through a plain record that can live in a shared memory region.
//!
//! Start from [`engine::EphemerisEngine`].

pub mod bodies;
pub mod config;
pub mod constants;
pub mod date_time;
pub mod earth_orientation;
pub mod engine;
pub mod ephemeris_data;
pub mod horizon;
pub mod kepler;
pub mod lighting;
pub mod orbital_elements;
pub mod ref_system;
pub mod shmem;
pub mod sky_color;
pub mod sky_errors;
pub mod stars;
pub mod time;

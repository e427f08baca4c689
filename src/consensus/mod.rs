pub mod genesis;
pub mod params;

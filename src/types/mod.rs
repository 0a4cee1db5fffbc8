pub mod aggregated;
pub mod combined;
pub mod into_instant;
pub mod sample;
pub mod series;

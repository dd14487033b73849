pub mod board;
pub mod chains;
pub mod engine;
pub mod hashing;
pub mod racks;
pub mod simulate;

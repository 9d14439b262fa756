pub mod export;
pub mod notation;

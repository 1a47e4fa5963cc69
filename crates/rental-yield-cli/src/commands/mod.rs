pub mod investment;
pub mod regions;

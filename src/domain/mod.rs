// Domain layer - Plain data types shared by every other layer
pub mod chart;
pub mod filter;
pub mod prediction;
pub mod series;
pub mod sidebar;

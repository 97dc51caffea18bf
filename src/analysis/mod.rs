pub mod analyzer;
pub mod config;
pub mod fuser;
pub mod indicator;
pub mod key_levels;
pub mod report;
pub mod stage;
pub mod strategy;
pub mod timeframe;
pub mod timeframe_spec;

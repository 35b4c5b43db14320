pub mod settings;
pub mod simulation;
pub mod types;

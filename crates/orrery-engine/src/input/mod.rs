pub mod pan;
pub mod queue;

pub mod trail;
#[cfg(feature = "vectors")]
pub mod vector;

pub mod naming;
pub mod sentiment;
pub mod store;

pub use sentiment::*;

pub mod schedule;
pub mod distribution;
pub mod sale;
pub mod stake;

pub use schedule::*;
pub use distribution::*;
pub use sale::*;
pub use stake::*;

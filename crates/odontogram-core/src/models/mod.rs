//! Domain models for the odontogram engine.

mod catalog;
mod payment;
mod plan;
mod tooth;

pub use catalog::*;
pub use payment::*;
pub use plan::*;
pub use tooth::*;

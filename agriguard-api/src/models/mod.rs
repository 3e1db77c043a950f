mod chat;
mod diagnosis;
mod irrigation;
mod sensor;

pub use chat::*;
pub use diagnosis::*;
pub use irrigation::*;
pub use sensor::*;

mod chat_handle;
mod diagnosis_handle;
mod docs_handle;
mod irrigation_handle;
mod sensor_handle;
mod sse_handle;

pub use chat_handle::*;
pub use diagnosis_handle::*;
pub use docs_handle::*;
pub use irrigation_handle::*;
pub use sensor_handle::*;
pub use sse_handle::*;

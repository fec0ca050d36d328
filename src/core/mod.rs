pub mod delivery;
pub mod pipeline;
pub mod render;

pub use crate::domain::ports::{ConfigProvider, MessageSink, Transport};
pub use crate::utils::error::Result;

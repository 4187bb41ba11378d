//! Status channel adapter.

mod channel;

pub use channel::{ChannelStatusSink, DEFAULT_STATUS_CAPACITY, MAX_STATUS_CAPACITY, status_channel};

pub mod js_executor;
pub mod log_sink;

pub use js_executor::JsExecutor;
pub use log_sink::{ChannelSink, LogSink, NullSink, RunLog};

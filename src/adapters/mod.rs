// Adapters layer: concrete implementations of the domain ports (Mist HTTP API, chat sinks).

pub mod console;
pub mod http;
pub mod slack;

pub use console::ConsoleSink;
pub use http::MistClient;
pub use slack::SlackSink;

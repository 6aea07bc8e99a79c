//! Telemetry: structured logging via tracing-subscriber.

mod init;

pub use init::init_telemetry;

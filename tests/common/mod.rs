#![allow(dead_code)]

pub mod mock_proxy;
pub mod recording_dispatcher;

pub use mock_proxy::{Call, MockProxy};
pub use recording_dispatcher::RecordingDispatcher;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

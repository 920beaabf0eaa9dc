//! Process-wide log setup shared by the binaries.

pub mod subscriber;

pub use subscriber::DEFAULT_DIRECTIVE;

/// Install the JSON subscriber, filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; only the first call installs anything.
pub fn init() {
    subscriber::init_with_default(DEFAULT_DIRECTIVE);
}

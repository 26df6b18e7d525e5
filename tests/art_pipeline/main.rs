//! Integration tests for `spindash-rs`: data image → manifest → art cache →
//! session ticks.

mod fixture;
mod pipeline;
mod scheduler;

/// Initializes logging once; later calls are ignored.
pub(crate) fn init_logger() {
	// Initialize logger with default level set to info if RUST_LOG is not set
	let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
		.is_test(true)
		.try_init();
}

//! Logging setup
//!
//! The crate logs through the `log` facade: font loads and page binding at
//! `debug`/`info`, recoverable descriptor problems at `warn`, per-layout
//! statistics at `trace`. Nothing is printed until a logger is installed.

pub use log::{debug, error, info, trace, warn};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "bitmap_font=info";

/// Install `env_logger`, honouring `RUST_LOG` and falling back to
/// [`DEFAULT_FILTER`]
///
/// Does nothing if a logger is already installed.
pub fn init() {
    let env = env_logger::Env::default().default_filter_or(DEFAULT_FILTER);
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Install a test logger that shows everything down to `trace` for this crate
///
/// Output is captured per test. Safe to call from every test.
pub fn init_for_tests() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_module("bitmap_font", log::LevelFilter::Trace)
        .try_init();
}

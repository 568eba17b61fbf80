//! Thin wrapper around the `log` facade.
//!
//! The library only ever calls `log::trace!`/`log::debug!` directly (see
//! `value_segment::get_any`'s slow-path diagnostic and
//! `table::compress_chunk`'s start/finish diagnostics) — it never pulls in
//! a logging backend itself. This module exists so tests and any
//! downstream binary have one place to install one.

/// Installs `env_logger` as the active backend. Call once, from test setup
/// or a playground `main`; harmless to call more than once.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

use virtuoso::{log, virtuoso};

/// The logger is initialised inside a synchronous main, before the tokio
/// runtime spins up its worker threads, so tracing is ready before the
/// first request arrives.
fn main() {
    log::init();

    virtuoso();
}

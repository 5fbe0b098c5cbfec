// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fs::File;
use std::io::{Stderr, stderr};
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_tree::time::UtcDateTime;

/// Keeps the log writers flushing. Drop it at the end of `main`.
#[must_use]
pub struct LogGuards {
    _file: WorkerGuard,
    _stderr: WorkerGuard,
    pub log_file: PathBuf,
}

pub fn log_file_path() -> PathBuf {
    let pid = std::process::id();
    std::env::temp_dir().join(format!("brickwork.{pid}.log"))
}

/// Installs the global subscriber: a hierarchical layer on stderr filtered by
/// `RUST_LOG`, and an unfiltered plain-text layer writing to
/// [`log_file_path`].
pub fn init_logging() -> std::io::Result<LogGuards> {
    let log_file = log_file_path();
    let logfile = File::create(&log_file)?;
    let (file_appender, file_guard) = tracing_appender::non_blocking(logfile);
    let (err_appender, err_guard) = tracing_appender::non_blocking(stderr());
    tracing_subscriber::registry()
        .with(
            tree_layer()
                .with_writer(err_appender)
                .with_filter(EnvFilter::from_default_env()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(file_appender).with_ansi(false))
        .init();
    Ok(LogGuards {
        _file: file_guard,
        _stderr: err_guard,
        log_file,
    })
}

pub fn tree_layer() -> tracing_tree::HierarchicalLayer<fn() -> Stderr, UtcDateTime> {
    tracing_tree::HierarchicalLayer::default()
        .with_indent_amount(2)
        .with_indent_lines(true)
        .with_deferred_spans(true)
        .with_span_retrace(true)
        .with_targets(true)
        .with_timer(UtcDateTime::default())
}

/// Evaluates a function or method call, logging how long it took at trace
/// level.
#[macro_export]
macro_rules! trace_call {
    ($recv:ident . $method:ident ($($args:expr),* $(,)?)) => { {
        let start = ::std::time::Instant::now();
        let out = $recv.$method($($args),*);
        let end = ::std::time::Instant::now();
        ::tracing::trace!(time = ?(end - start), stringify!($recv.$method));
        out
    } };
    ($($path:ident)::*($($args:expr),* $(,)?)) => { {
        let start = ::std::time::Instant::now();
        let out = $($path)::* ($($args),*);
        let end = ::std::time::Instant::now();
        ::tracing::trace!(time = ?(end - start), stringify!($($path)::*));
        out
    } };
}

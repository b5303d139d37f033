use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn build_filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match (verbose, level) {
        (true, _) => EnvFilter::new("checkin_geo=debug,info"),
        (false, Some(level)) => EnvFilter::new(format!("checkin_geo={}", level)),
        (false, None) => EnvFilter::new("checkin_geo=info"),
    })
}

fn compact_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(writer)
        .compact()
}

/// Logs go to stderr so stdout carries only command output.
pub fn init_cli_logger(verbose: bool, level: Option<&str>) {
    tracing_subscriber::registry()
        .with(build_filter(verbose, level))
        .with(compact_layer(std::io::stderr))
        .init();
}

/// JSON lines on stderr, for runs collected by a log shipper.
pub fn init_json_logger(verbose: bool, level: Option<&str>) {
    tracing_subscriber::registry()
        .with(build_filter(verbose, level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .json(),
        )
        .init();
}

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::LevelFilter;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Log level selected by the `--quiet` and `--verbose` flags.
pub fn level_from_flags(quiet: bool, verbose: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Warn,
        (false, true) => LevelFilter::Debug,
        (false, false) => LevelFilter::Info,
    }
}

/// Initializes stderr logging as `[seconds.millis] LEVEL message`.
///
/// At debug level the last segment of the emitting module is added, so
/// per-round search messages can be told apart from model messages.
/// `RUST_LOG` filters are read first; `level` overrides the default.
pub fn init_logger(level: LevelFilter) {
    let start = *START_TIME.get_or_init(Instant::now);
    let with_target = level >= LevelFilter::Debug;

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format(move |buf, record| {
            let elapsed = start.elapsed();
            write!(
                buf,
                "[{:>4}.{:03}] {:<5} ",
                elapsed.as_secs(),
                elapsed.subsec_millis(),
                record.level()
            )?;
            if with_target {
                let module = record.target().rsplit("::").next().unwrap_or_default();
                write!(buf, "{}: ", module)?;
            }
            writeln!(buf, "{}", record.args())
        })
        .target(env_logger::Target::Stderr)
        .init();
}

use fern::colors::{Color, ColoredLevelConfig};

use crate::core::config::LogConfig;

/// Install the global console logger.
///
/// Info and below go to stdout, warnings and errors to stderr. Only
/// binaries should call this; the library itself just emits through `log`.
pub fn init_logging(config: LogConfig) -> Result<(), log::SetLoggerError> {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Magenta)
        .info(Color::Cyan)
        .warn(Color::Yellow)
        .error(Color::Red);

    let stdout = fern::Dispatch::new()
        .filter(|meta| meta.level() >= log::Level::Info)
        .chain(std::io::stdout());

    let stderr = fern::Dispatch::new().level(log::LevelFilter::Warn).chain(std::io::stderr());

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                colors.color(record.level()),
                message
            ))
        })
        .level(config.level)
        .chain(stdout)
        .chain(stderr)
        .apply()?;

    log::trace!("log initialized!");
    Ok(())
}

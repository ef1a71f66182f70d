use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Installs the global subscriber. Logs go to stderr so they do not mix
/// with the report on stdout.
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Maps `-v`/`-q` counts to a default level; `RUST_LOG` wins when set.
fn env_filter(verbose: u8, quiet: u8) -> anyhow::Result<EnvFilter> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))
}

/// Logs to stderr; used by the one-shot commands.
pub fn init_stderr(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose, quiet)?)
        .with_target(true)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
    Ok(())
}

/// Opens `taskpro.log` in `dir`, emptying whatever the previous session left.
fn open_log(dir: &Path) -> anyhow::Result<File> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join("taskpro.log");
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))
}

/// Logs to `taskpro.log` in `dir`, keeping the terminal free for the UI.
/// The file only holds the current session.
pub fn init_file(dir: &Path, verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let file = open_log(dir)?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose, quiet)?)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn log_starts_empty_each_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = open_log(dir.path()).unwrap();
        writeln!(first, "previous session").unwrap();
        drop(first);

        open_log(dir.path()).unwrap();
        let contents = std::fs::read_to_string(dir.path().join("taskpro.log")).unwrap();
        assert!(contents.is_empty());
    }
}

use anyhow::{Context, Result};
use tracing::debug;

/// Waits for a signal that requests a graceful shutdown, like SIGTERM or SIGINT.
#[cfg(unix)]
async fn wait_for_signal_impl() -> Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut signal_terminate = signal(SignalKind::terminate())?;
    let mut signal_interrupt = signal(SignalKind::interrupt())?;

    Ok(tokio::select! {
        _ = signal_terminate.recv() => "SIGTERM",
        _ = signal_interrupt.recv() => "SIGINT",
    })
}

#[cfg(not(unix))]
async fn wait_for_signal_impl() -> Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("CTRL_C")
}

pub async fn shutdown_signal() {
    match wait_for_signal_impl().await {
        Ok(name) => debug!("Received signal: {}", name),
        Err(e) => {
            debug!("signal handler unavailable: {}", e);
            std::future::pending::<()>().await
        }
    }
}

/// Reads `path`, else `{name}.toml`, else `/etc/{name}/{name}.toml`. No file at all means
/// defaults; a file that fails to parse is an error.
pub fn load<T>(name: &str, path: Option<String>) -> Result<T>
where
    T: serde::de::DeserializeOwned + std::default::Default,
{
    use std::fs::read_to_string;
    let candidates = match path {
        Some(path) => vec![path],
        None => vec![format!("{name}.toml"), format!("/etc/{name}/{name}.toml")],
    };
    for candidate in candidates {
        if let Ok(content) = read_to_string(&candidate) {
            return toml::from_str(&content)
                .with_context(|| format!("config load error: {}", candidate));
        }
    }
    Ok(Default::default())
}

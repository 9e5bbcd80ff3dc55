use std::process::Stdio;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::process::{Child, Command};
use tracing::debug;

const URL_PLACEHOLDER: &str = "{url}";
const OFFSET_PLACEHOLDER: &str = "{offset}";

/// External command line with `{url}` and `{offset}` placeholders,
/// e.g. `ffplay -loglevel error -ss {offset} {url}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    args: Vec<String>,
}

impl CommandTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let args = shellwords::split(template)
            .map_err(|_| anyhow!("invalid command template [{}]: mismatched quotes", template))?;
        if args.is_empty() {
            return Err(anyhow!("command template is empty"));
        }
        if !args.iter().any(|arg| arg.contains(URL_PLACEHOLDER)) {
            return Err(anyhow!("command template has no {} placeholder", URL_PLACEHOLDER));
        }
        Ok(Self { args })
    }

    /// Placeholders are substituted per argument, so a url is never split by the shell parser.
    pub fn render(&self, url: &str, offset: Duration) -> Vec<String> {
        let offset = offset.as_secs().to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace(URL_PLACEHOLDER, url)
                    .replace(OFFSET_PLACEHOLDER, &offset)
            })
            .collect()
    }

    pub fn spawn(&self, url: &str, offset: Duration) -> Result<Child> {
        create_child(self.render(url, offset))
    }
}

/// Spawns `args` as a child process that is killed when the handle is dropped.
pub fn create_child(mut args: Vec<String>) -> Result<Child> {
    if args.is_empty() {
        return Err(anyhow!("empty command"));
    }
    let program = args.remove(0);
    debug!("spawn child: {} {:?}", program, args);
    let child = Command::new(&program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| anyhow!("failed to start {}: {}", program, e))?;
    Ok(child)
}

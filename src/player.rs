use std::time::Duration;

use anyhow::Result;
use tokio::process::Child;
use tracing::{debug, info};

use cli::CommandTemplate;
use playback::{MediaHandle, MediaSurface};

/// Plays streams in an external player process, one process per attached url.
pub struct ProcessSurface {
    template: CommandTemplate,
}

impl ProcessSurface {
    pub fn new(template: CommandTemplate) -> Self {
        Self { template }
    }
}

impl MediaSurface for ProcessSurface {
    type Handle = PlayerProcess;

    fn attach(&mut self, url: &str) -> Result<PlayerProcess> {
        let child = self.template.spawn(url, Duration::ZERO)?;
        info!("player started, pid {:?}", child.id());
        Ok(PlayerProcess {
            url: url.to_owned(),
            template: self.template.clone(),
            child,
        })
    }
}

/// The player is killed when this is dropped.
pub struct PlayerProcess {
    url: String,
    template: CommandTemplate,
    child: Child,
}

impl MediaHandle for PlayerProcess {
    fn url(&self) -> &str {
        &self.url
    }

    /// External players cannot be driven in place, so the player is restarted at `position`.
    fn seek(&mut self, position: Duration) -> Result<()> {
        if let Err(e) = self.child.start_kill() {
            debug!("player already exited: {}", e);
        }
        self.child = self.template.spawn(&self.url, position)?;
        debug!("player restarted at {}s, pid {:?}", position.as_secs(), self.child.id());
        Ok(())
    }
}

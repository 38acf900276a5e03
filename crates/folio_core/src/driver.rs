//! Timer task that drives a [`TypingCycler`] and publishes its text.

use serde::Serialize;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info};

use crate::typing::{TypingCycler, TypingMode};

/// What a renderer needs to draw one frame of the animation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypingFrame {
    pub text: String,
    pub phrase_index: usize,
    pub mode: TypingMode,
}

impl From<&TypingCycler> for TypingFrame {
    fn from(cycler: &TypingCycler) -> Self {
        Self {
            text: cycler.displayed().to_string(),
            phrase_index: cycler.phrase_index(),
            mode: cycler.mode(),
        }
    }
}

/// Owner of a running typing animation.
///
/// The task is aborted when the handle is stopped or dropped, so no tick
/// fires after teardown.
pub struct TypingHandle {
    frames: watch::Receiver<TypingFrame>,
    task: JoinHandle<()>,
}

impl TypingHandle {
    /// Spawns the driver on the current tokio runtime.
    pub fn spawn(cycler: TypingCycler) -> Self {
        let (tx, frames) = watch::channel(TypingFrame::from(&cycler));
        info!(phrases = cycler.phrases().len(), "typing: driver started");
        let task = tokio::spawn(run(cycler, tx));
        Self { frames, task }
    }

    pub fn subscribe(&self) -> watch::Receiver<TypingFrame> {
        self.frames.clone()
    }

    pub fn current(&self) -> TypingFrame {
        self.frames.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for TypingHandle {
    fn drop(&mut self) {
        self.task.abort();
        debug!("typing: driver stopped");
    }
}

async fn run(mut cycler: TypingCycler, tx: watch::Sender<TypingFrame>) {
    let mut delay = cycler.initial_delay();
    loop {
        tokio::time::sleep(delay).await;
        delay = cycler.tick();
        if tx.send(TypingFrame::from(&cycler)).is_err() {
            break;
        }
    }
}

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod tests;

use std::{future::Future, io::Write};

use anyhow::{Context, Result};
use folio_core::{TypingCycler, TypingFrame, TypingHandle, TypingMode};
use tracing::info;

use crate::settings::FolioSettings;

pub async fn run(settings: &FolioSettings, phrases: Option<usize>) -> Result<()> {
    let cycler = TypingCycler::with_timing(settings.phrases.clone(), settings.typing.timing())
        .context("invalid typing settings")?;
    let handle = TypingHandle::spawn(cycler);

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let mut stdout = std::io::stdout();
    let completed = animate(handle, &mut stdout, phrases, shutdown).await?;
    info!(completed, "typing: animation finished");
    Ok(())
}

/// Redraws the current line with the typed text and a cursor.
pub fn render_line(frame: &TypingFrame) -> String {
    format!("\r\x1b[2K{}|", frame.text)
}

/// Draws frames until `limit` phrases have been typed and deleted, the
/// driver stops, or `shutdown` resolves. Returns the completed count.
pub async fn animate<W, F>(
    handle: TypingHandle,
    out: &mut W,
    limit: Option<usize>,
    shutdown: F,
) -> Result<usize>
where
    W: Write,
    F: Future<Output = ()>,
{
    let mut frames = handle.subscribe();
    let first = frames.borrow_and_update().clone();
    draw(out, &first)?;

    let mut previous = first.mode;
    let mut completed = 0;
    tokio::pin!(shutdown);

    while limit.map_or(true, |limit| completed < limit) {
        tokio::select! {
            changed = frames.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame = frames.borrow_and_update().clone();
                if previous != TypingMode::Typing && frame.mode == TypingMode::Typing {
                    completed += 1;
                }
                previous = frame.mode;
                draw(out, &frame)?;
            }
            _ = &mut shutdown => break,
        }
    }

    handle.stop();
    writeln!(out)?;
    out.flush()?;
    Ok(completed)
}

fn draw<W: Write>(out: &mut W, frame: &TypingFrame) -> Result<()> {
    out.write_all(render_line(frame).as_bytes())?;
    out.flush()?;
    Ok(())
}

//! Chord loop command handler.

use super::load_keymap;
use anyhow::Result;
use chorder::{ChordInput, InputAction, PrintSink, VirtualKeyboard};
use chorder_core::{Chorder, KeySink};
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Build the interpreter and feed it chords from stdin until EOF, Ctrl+C or
/// a shutdown gesture.
pub async fn run(path: &Path, dry_run: bool, contacts: bool) -> Result<()> {
    let (config, keymap) = load_keymap(path)?;
    for issue in keymap.validate() {
        warn!("Keymap issue: {}", issue);
    }

    let input = if contacts {
        ChordInput::contacts()
    } else {
        ChordInput::Indices
    };

    if dry_run {
        info!("Dry run: printing key events");
        let chorder = Chorder::new(keymap, PrintSink::new(std::io::stdout()));
        return chord_loop(chorder, input).await;
    }

    let mut keyboard = VirtualKeyboard::new(&config.device_name, &keymap.key_codes())?;
    info!("Created virtual keyboard: {}", config.device_name);
    if let Some(path) = keyboard.device_path() {
        info!("Device path: {}", path.display());
    }
    chord_loop(Chorder::new(keymap, keyboard), input).await
}

async fn chord_loop<S: KeySink>(mut chorder: Chorder<S>, mut input: ChordInput) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let result = loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        info!("End of input");
                        break Ok(());
                    }
                    Err(e) => break Err(e.into()),
                };
                match dispatch_line(&mut chorder, &mut input, &line) {
                    Ok(true) => {}
                    Ok(false) => break Ok(()),
                    Err(e) => break Err(e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break Ok(());
            }
        }
    };

    // Release held modifiers even when the loop failed
    let teardown = chorder.destroy();
    result?;
    teardown?;
    info!("Shut down");
    Ok(())
}

/// Dispatch every chord on one input line. Returns `false` on a shutdown
/// gesture. Non-fatal interpreter errors are logged and the line continues.
pub(crate) fn dispatch_line<S: KeySink>(
    chorder: &mut Chorder<S>,
    input: &mut ChordInput,
    line: &str,
) -> Result<bool> {
    for action in input.feed_line(line) {
        match action {
            InputAction::Shutdown => {
                info!("Shutdown gesture");
                return Ok(false);
            }
            InputAction::Chord(index) => match chorder.press(index) {
                Ok(()) => debug!(index, map = chorder.current_map(), "Chord dispatched"),
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(e) => warn!(index, "Chord not dispatched: {}", e),
            },
        }
    }
    Ok(true)
}

//! Key event sinks: a virtual keyboard using evdev/uinput, and a printing
//! sink for dry runs.

use chorder_core::{KeyCode, KeyEvent, KeySink, SinkError};
use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, Key,
};
use std::io::Write;
use thiserror::Error;
use tracing::debug;

/// Errors from virtual keyboard operations
#[derive(Debug, Error)]
pub enum KeyboardError {
    #[error("Failed to create virtual device: {0}")]
    CreateDevice(#[source] std::io::Error),
    #[error("Failed to emit event: {0}")]
    EmitEvent(#[source] std::io::Error),
    #[error("Key code {0} is not advertised by the device")]
    UnknownKey(KeyCode),
}

/// Virtual keyboard device
pub struct VirtualKeyboard {
    device: VirtualDevice,
    keys: AttributeSet<Key>,
}

impl VirtualKeyboard {
    /// Create a new virtual keyboard device
    ///
    /// # Arguments
    /// * `name` - Device name (shown in `evtest` and `libinput list-devices`)
    /// * `codes` - Every key code the device may emit
    pub fn new(name: &str, codes: &[KeyCode]) -> Result<Self, KeyboardError> {
        let mut keys = AttributeSet::<Key>::new();
        for &code in codes {
            keys.insert(Key::new(code));
        }

        let device = VirtualDeviceBuilder::new()
            .map_err(KeyboardError::CreateDevice)?
            .name(name)
            .with_keys(&keys)
            .map_err(KeyboardError::CreateDevice)?
            .build()
            .map_err(KeyboardError::CreateDevice)?;
        debug!(keys = codes.len(), "Created virtual keyboard");

        Ok(Self { device, keys })
    }

    /// Press or release a key
    pub fn send(&mut self, code: KeyCode, pressed: bool) -> Result<(), KeyboardError> {
        if !self.keys.contains(Key::new(code)) {
            return Err(KeyboardError::UnknownKey(code));
        }
        let event = InputEvent::new(EventType::KEY, code, i32::from(pressed));
        self.device
            .emit(&[event])
            .map_err(KeyboardError::EmitEvent)
    }

    /// Get the device path (e.g., /dev/input/eventX)
    pub fn device_path(&mut self) -> Option<std::path::PathBuf> {
        self.device
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }
}

impl KeySink for VirtualKeyboard {
    fn emit(&mut self, code: KeyCode, pressed: bool) -> Result<(), SinkError> {
        Ok(self.send(code, pressed)?)
    }
}

/// Sink that writes one line per event, e.g. `↓LeftShift`
pub struct PrintSink<W> {
    out: W,
}

impl<W: Write> PrintSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> KeySink for PrintSink<W> {
    fn emit(&mut self, code: KeyCode, pressed: bool) -> Result<(), SinkError> {
        writeln!(self.out, "{}", KeyEvent { code, pressed })?;
        self.out.flush()?;
        Ok(())
    }
}

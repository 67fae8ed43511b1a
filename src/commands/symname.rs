//! Key-name lookup command handler.

use anyhow::{bail, Result};
use chorder_core::keys;

/// `KEY_*` symbol for `name`, followed by the code if `show_code` is set.
fn describe(name: &str, show_code: bool) -> Option<String> {
    let code = keys::key_code_from_name(name)?;
    let symbol = keys::kernel_name(code).unwrap_or_else(|| format!("0x{code:02x}"));
    Some(if show_code {
        format!("{symbol} {code}")
    } else {
        symbol
    })
}

/// Print the kernel symbol of a key name; fails for unknown names.
pub fn symname(name: &str, show_code: bool) -> Result<()> {
    match describe(name, show_code) {
        Some(line) => {
            println!("{line}");
            Ok(())
        }
        None => bail!("Unknown key name: {name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names() {
        assert_eq!(describe("BackSpace", false).as_deref(), Some("KEY_BACKSPACE"));
        assert_eq!(describe("Shift_L", true).as_deref(), Some("KEY_LEFTSHIFT 42"));
        assert_eq!(describe("KEY_ENTER", false).as_deref(), Some("KEY_ENTER"));
        assert_eq!(describe("a", true).as_deref(), Some("KEY_A 30"));
    }

    #[test]
    fn unknown_name_fails() {
        assert_eq!(describe("NoSuchKey", false), None);
        assert!(symname("NoSuchKey", false).is_err());
    }
}

//! Key codes and key names
//!
//! Codes are Linux input-event `KEY_*` values (see `linux/input-event-codes.h`),
//! which is what the uinput sink emits. Names are matched case-insensitively.
//! X11 keysym spellings (`BackSpace`, `Prior`, `Return`, `Shift_L`, ...) are
//! accepted as aliases so GKOS layouts written against the X11 keysym names
//! keep loading.

/// A key code as emitted to the sink.
pub type KeyCode = u16;

/// Canonical key names. The kernel name is always `KEY_` + the uppercased
/// display name.
#[rustfmt::skip]
const KEYS: &[(&str, KeyCode)] = &[
    ("Escape", 1),
    ("1", 2), ("2", 3), ("3", 4), ("4", 5), ("5", 6),
    ("6", 7), ("7", 8), ("8", 9), ("9", 10), ("0", 11),
    ("Minus", 12), ("Equal", 13), ("Backspace", 14), ("Tab", 15),
    ("Q", 16), ("W", 17), ("E", 18), ("R", 19), ("T", 20),
    ("Y", 21), ("U", 22), ("I", 23), ("O", 24), ("P", 25),
    ("LeftBrace", 26), ("RightBrace", 27), ("Enter", 28), ("LeftCtrl", 29),
    ("A", 30), ("S", 31), ("D", 32), ("F", 33), ("G", 34),
    ("H", 35), ("J", 36), ("K", 37), ("L", 38),
    ("Semicolon", 39), ("Apostrophe", 40), ("Grave", 41), ("LeftShift", 42),
    ("Backslash", 43),
    ("Z", 44), ("X", 45), ("C", 46), ("V", 47), ("B", 48), ("N", 49), ("M", 50),
    ("Comma", 51), ("Dot", 52), ("Slash", 53), ("RightShift", 54),
    ("KpAsterisk", 55), ("LeftAlt", 56), ("Space", 57), ("CapsLock", 58),
    ("F1", 59), ("F2", 60), ("F3", 61), ("F4", 62), ("F5", 63),
    ("F6", 64), ("F7", 65), ("F8", 66), ("F9", 67), ("F10", 68),
    ("NumLock", 69), ("ScrollLock", 70),
    ("Kp7", 71), ("Kp8", 72), ("Kp9", 73), ("KpMinus", 74),
    ("Kp4", 75), ("Kp5", 76), ("Kp6", 77), ("KpPlus", 78),
    ("Kp1", 79), ("Kp2", 80), ("Kp3", 81), ("Kp0", 82), ("KpDot", 83),
    ("F11", 87), ("F12", 88),
    ("KpEnter", 96), ("RightCtrl", 97), ("KpSlash", 98), ("SysRq", 99),
    ("RightAlt", 100),
    ("Home", 102), ("Up", 103), ("PageUp", 104), ("Left", 105), ("Right", 106),
    ("End", 107), ("Down", 108), ("PageDown", 109), ("Insert", 110), ("Delete", 111),
    ("Mute", 113), ("VolumeDown", 114), ("VolumeUp", 115), ("Pause", 119),
    ("LeftMeta", 125), ("RightMeta", 126), ("Compose", 127),
];

/// Alternative spellings, already normalized (see [`normalize`]).
const ALIASES: &[(&str, &str)] = &[
    // X11 keysyms
    ("return", "Enter"),
    ("prior", "PageUp"),
    ("next", "PageDown"),
    ("period", "Dot"),
    ("bracketleft", "LeftBrace"),
    ("bracketright", "RightBrace"),
    ("quoteright", "Apostrophe"),
    ("quoteleft", "Grave"),
    ("controll", "LeftCtrl"),
    ("controlr", "RightCtrl"),
    ("shiftl", "LeftShift"),
    ("shiftr", "RightShift"),
    ("altl", "LeftAlt"),
    ("altr", "RightAlt"),
    ("superl", "LeftMeta"),
    ("superr", "RightMeta"),
    ("metal", "LeftMeta"),
    ("metar", "RightMeta"),
    ("print", "SysRq"),
    ("menu", "Compose"),
    ("kpmultiply", "KpAsterisk"),
    ("kpdivide", "KpSlash"),
    ("kpadd", "KpPlus"),
    ("kpsubtract", "KpMinus"),
    ("kpdecimal", "KpDot"),
    // Short forms
    ("esc", "Escape"),
    ("bs", "Backspace"),
    ("del", "Delete"),
    ("ins", "Insert"),
    ("pgup", "PageUp"),
    ("pgdn", "PageDown"),
    ("caps", "CapsLock"),
    ("ctrl", "LeftCtrl"),
    ("control", "LeftCtrl"),
    ("lctrl", "LeftCtrl"),
    ("rctrl", "RightCtrl"),
    ("shift", "LeftShift"),
    ("lshift", "LeftShift"),
    ("rshift", "RightShift"),
    ("alt", "LeftAlt"),
    ("lalt", "LeftAlt"),
    ("ralt", "RightAlt"),
    ("altgr", "RightAlt"),
    ("super", "LeftMeta"),
    ("meta", "LeftMeta"),
    ("win", "LeftMeta"),
    ("gui", "LeftMeta"),
    // Punctuation characters
    ("-", "Minus"),
    ("=", "Equal"),
    ("[", "LeftBrace"),
    ("]", "RightBrace"),
    ("\\", "Backslash"),
    (";", "Semicolon"),
    ("'", "Apostrophe"),
    ("`", "Grave"),
    (",", "Comma"),
    (".", "Dot"),
    ("/", "Slash"),
];

/// Lowercase, strip `KEY_`/`XK_` prefixes and (for multi-character names)
/// underscores.
fn normalize(name: &str) -> String {
    let name = name.trim();
    let lower = name.to_ascii_lowercase();
    let stripped = lower
        .strip_prefix("key_")
        .or_else(|| lower.strip_prefix("xk_"))
        .unwrap_or(&lower);
    if stripped.chars().count() > 1 {
        stripped.replace('_', "")
    } else {
        stripped.to_string()
    }
}

fn display_code(display: &str) -> Option<KeyCode> {
    KEYS.iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(display))
        .map(|&(_, code)| code)
}

/// Resolve a key name to its code.
///
/// Accepts display names (`LeftShift`), kernel names (`KEY_LEFTSHIFT`),
/// X11 keysyms (`Shift_L`, `XK_BackSpace`) and punctuation characters (`,`).
pub fn key_code_from_name(name: &str) -> Option<KeyCode> {
    let norm = normalize(name);
    if norm.is_empty() {
        return None;
    }
    if let Some(code) = display_code(&norm) {
        return Some(code);
    }
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == norm)
        .and_then(|(_, display)| display_code(display))
}

/// Display name of a code (`LeftShift`), if it is in the table.
pub fn key_name(code: KeyCode) -> Option<&'static str> {
    KEYS.iter().find(|&&(_, c)| c == code).map(|&(name, _)| name)
}

/// Kernel symbol of a code (`KEY_LEFTSHIFT`).
pub fn kernel_name(code: KeyCode) -> Option<String> {
    key_name(code).map(|name| format!("KEY_{}", name.to_ascii_uppercase()))
}

/// All codes with a name, in ascending order.
pub fn known_codes() -> impl Iterator<Item = KeyCode> {
    KEYS.iter().map(|&(_, code)| code)
}

/// Map a character of US-layout text to `(code, needs_shift)`.
pub fn char_to_key(ch: char) -> Option<(KeyCode, bool)> {
    let (name, shift): (&str, bool) = match ch {
        'a'..='z' | '0'..='9' => return key_code_from_name(&ch.to_string()).map(|c| (c, false)),
        'A'..='Z' => return key_code_from_name(&ch.to_string()).map(|c| (c, true)),
        ' ' => ("Space", false),
        '\n' => ("Enter", false),
        '\t' => ("Tab", false),
        '-' => ("Minus", false),
        '=' => ("Equal", false),
        '[' => ("LeftBrace", false),
        ']' => ("RightBrace", false),
        '\\' => ("Backslash", false),
        ';' => ("Semicolon", false),
        '\'' => ("Apostrophe", false),
        '`' => ("Grave", false),
        ',' => ("Comma", false),
        '.' => ("Dot", false),
        '/' => ("Slash", false),
        '!' => ("1", true),
        '@' => ("2", true),
        '#' => ("3", true),
        '$' => ("4", true),
        '%' => ("5", true),
        '^' => ("6", true),
        '&' => ("7", true),
        '*' => ("8", true),
        '(' => ("9", true),
        ')' => ("0", true),
        '_' => ("Minus", true),
        '+' => ("Equal", true),
        '{' => ("LeftBrace", true),
        '}' => ("RightBrace", true),
        '|' => ("Backslash", true),
        ':' => ("Semicolon", true),
        '"' => ("Apostrophe", true),
        '~' => ("Grave", true),
        '<' => ("Comma", true),
        '>' => ("Dot", true),
        '?' => ("Slash", true),
        _ => return None,
    };
    display_code(name).map(|code| (code, shift))
}

/// Well-known codes used by the layout generator.
pub mod code {
    use super::KeyCode;

    pub const LEFTCTRL: KeyCode = 29;
    pub const LEFTSHIFT: KeyCode = 42;
    pub const LEFTALT: KeyCode = 56;
    pub const LEFTMETA: KeyCode = 125;
    pub const RIGHTCTRL: KeyCode = 97;
    pub const RIGHTSHIFT: KeyCode = 54;
    pub const RIGHTALT: KeyCode = 100;
    pub const RIGHTMETA: KeyCode = 126;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_resolve() {
        assert_eq!(key_code_from_name("A"), Some(30));
        assert_eq!(key_code_from_name("a"), Some(30));
        assert_eq!(key_code_from_name("LeftShift"), Some(42));
        assert_eq!(key_code_from_name("F12"), Some(88));
        assert_eq!(key_code_from_name("0"), Some(11));
    }

    #[test]
    fn kernel_and_x11_names_resolve() {
        assert_eq!(key_code_from_name("KEY_BACKSPACE"), Some(14));
        assert_eq!(key_code_from_name("BackSpace"), Some(14));
        assert_eq!(key_code_from_name("XK_Prior"), Some(104));
        assert_eq!(key_code_from_name("Next"), Some(109));
        assert_eq!(key_code_from_name("Return"), Some(28));
        assert_eq!(key_code_from_name("Shift_L"), Some(42));
        assert_eq!(key_code_from_name("Control_L"), Some(29));
        assert_eq!(key_code_from_name("Caps_Lock"), Some(58));
        assert_eq!(key_code_from_name("space"), Some(57));
    }

    #[test]
    fn punctuation_names_resolve() {
        assert_eq!(key_code_from_name(","), Some(51));
        assert_eq!(key_code_from_name("."), Some(52));
        assert_eq!(key_code_from_name("-"), Some(12));
        assert_eq!(key_code_from_name("period"), Some(52));
    }

    #[test]
    fn unknown_names() {
        assert_eq!(key_code_from_name(""), None);
        assert_eq!(key_code_from_name("Hyper"), None);
        assert_eq!(key_code_from_name("_"), None);
    }

    #[test]
    fn every_display_name_is_unique_and_round_trips() {
        for code in known_codes() {
            let name = key_name(code).unwrap();
            assert_eq!(key_code_from_name(name), Some(code), "{name}");
        }
    }

    #[test]
    fn kernel_name_format() {
        assert_eq!(kernel_name(42).as_deref(), Some("KEY_LEFTSHIFT"));
        assert_eq!(kernel_name(104).as_deref(), Some("KEY_PAGEUP"));
        assert_eq!(kernel_name(0), None);
    }

    #[test]
    fn text_characters() {
        assert_eq!(char_to_key('e'), Some((18, false)));
        assert_eq!(char_to_key('E'), Some((18, true)));
        assert_eq!(char_to_key('?'), Some((53, true)));
        assert_eq!(char_to_key(' '), Some((57, false)));
        assert_eq!(char_to_key('é'), None);
    }
}

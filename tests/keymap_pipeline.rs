//! End-to-end: GKOS layout → keymap file on disk → interpreter.

use chorder::{ChordInput, ChorderConfig, GkosLayout, InputAction, KeymapFileError};
use chorder_core::{Chorder, ChordEntry, KeyEvent, RecordingSink};
use tempfile::tempdir;

const SHIFT: u16 = 42;
const CTRL: u16 = 29;

fn english_chorder() -> Chorder<RecordingSink> {
    let keymap = GkosLayout::english()
        .unwrap()
        .to_config()
        .unwrap()
        .to_keymap()
        .unwrap();
    Chorder::new(keymap, RecordingSink::new())
}

fn press_all(chorder: &mut Chorder<RecordingSink>, chords: &[usize]) {
    for &chord in chords {
        chorder.press(chord).unwrap();
    }
}

#[test]
fn generated_keymap_survives_save_and_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    let layout_path = dir.path().join("layout.json");
    let keymap_path = dir.path().join("nested/keymap.toml");

    let layout = GkosLayout::english().unwrap();
    std::fs::write(&layout_path, serde_json::to_string_pretty(&layout).unwrap()).unwrap();

    let config = GkosLayout::load(&layout_path).unwrap().to_config().unwrap();
    config.save(&keymap_path).unwrap();
    let loaded = ChorderConfig::load(&keymap_path).unwrap();

    assert_eq!(loaded, config);
    assert_eq!(
        loaded.to_keymap().unwrap(),
        ChorderConfig::builtin().unwrap().to_keymap().unwrap()
    );
}

#[test]
fn hand_edited_bindings_override_generated_entries() {
    let mut config = ChorderConfig::builtin().unwrap();
    config.maps[0]
        .bind
        .insert("1".to_string(), "Macro(H, I)".to_string());
    config.maps[0]
        .bind
        .insert("0".to_string(), "MapLock(symbols)".to_string());

    let keymap = config.to_keymap().unwrap();
    assert_eq!(
        keymap.lookup(0, 1).unwrap(),
        &ChordEntry::Macro(vec![ChordEntry::Key(35), ChordEntry::Key(23)])
    );
    assert_eq!(keymap.lookup(0, 0).unwrap(), &ChordEntry::MapLock(2));
}

#[test]
fn invalid_file_reports_parse_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("keymap.toml");
    std::fs::write(&path, "maps = 3").unwrap();
    assert!(matches!(
        ChorderConfig::load(&path),
        Err(KeymapFileError::Parse(_))
    ));
}

#[test]
fn word_macro_types_each_letter() {
    let mut chorder = english_chorder();
    // 53 = "the"
    press_all(&mut chorder, &[53]);
    let t = 20;
    let h = 35;
    let e = 18;
    assert_eq!(
        chorder.sink().events(),
        &[
            KeyEvent::press(t),
            KeyEvent::release(t),
            KeyEvent::press(h),
            KeyEvent::release(h),
            KeyEvent::press(e),
            KeyEvent::release(e),
        ]
    );
}

#[test]
fn shift_twice_locks_for_capitals_third_press_releases() {
    let mut chorder = english_chorder();
    // Shift, Shift, e, t, Shift
    press_all(&mut chorder, &[18, 18, 1, 2, 18]);
    assert_eq!(
        chorder.sink().events(),
        &[
            KeyEvent::press(SHIFT),
            KeyEvent::press(18),
            KeyEvent::release(18),
            KeyEvent::press(20),
            KeyEvent::release(20),
            KeyEvent::release(SHIFT),
        ]
    );
    assert_eq!(chorder.held_count(), 0);
}

#[test]
fn ctrl_word_left_macro() {
    let mut chorder = english_chorder();
    // 15 = Ctrl+Left
    press_all(&mut chorder, &[15]);
    assert_eq!(
        chorder.sink().events(),
        &[
            KeyEvent::press(CTRL),
            KeyEvent::press(105),
            KeyEvent::release(105),
            KeyEvent::release(CTRL),
        ]
    );
}

#[test]
fn held_shift_applies_once_across_shifted_punctuation() {
    let mut chorder = english_chorder();
    // Shift, then '?' (12), which carries its own Shift
    press_all(&mut chorder, &[18, 12]);
    assert_eq!(
        chorder.sink().events(),
        &[
            KeyEvent::press(SHIFT),
            KeyEvent::press(53),
            KeyEvent::release(53),
            KeyEvent::release(SHIFT),
        ]
    );
}

#[test]
fn symbols_lock_toggles() {
    let mut chorder = english_chorder();
    // SYMBOLS twice locks the symbols map
    press_all(&mut chorder, &[45, 45]);
    assert_eq!(chorder.current_map(), 2);
    assert!(chorder.is_map_locked());

    // '!' on symbols, twice
    press_all(&mut chorder, &[1, 1]);
    assert_eq!(chorder.current_map(), 2);
    assert_eq!(chorder.sink().events().len(), 8);

    // Third SYMBOLS returns to lowercase
    press_all(&mut chorder, &[45]);
    assert_eq!(chorder.current_map(), 0);
    assert!(!chorder.is_map_locked());
}

#[test]
fn contact_stream_types_through_builtin_keymap() {
    let mut chorder = english_chorder();
    let mut input = ChordInput::contacts();
    // Button 4 is bit 1 (e); button 2 is bit 2 (t)
    for action in input.feed_line("+4 -4 +2 -2") {
        match action {
            InputAction::Chord(index) => chorder.press(index).unwrap(),
            InputAction::Shutdown => panic!("unexpected shutdown"),
        }
    }
    assert_eq!(
        chorder.sink().events(),
        &[
            KeyEvent::press(18),
            KeyEvent::release(18),
            KeyEvent::press(20),
            KeyEvent::release(20),
        ]
    );
}

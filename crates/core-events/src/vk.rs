//! Virtual-key numbering carried by [`crate::KeyEvent::virtual_key`].
//!
//! The values follow the Windows console VK table so key bindings read the
//! same on every platform; the crossterm translation in `core-input` maps
//! onto these.

pub const BACK: u16 = 8;
pub const TAB: u16 = 9;
pub const RETURN: u16 = 13;
pub const SHIFT: u16 = 16;
pub const CONTROL: u16 = 17;
pub const MENU: u16 = 18;
pub const ESCAPE: u16 = 27;
pub const SPACE: u16 = 32;
pub const PRIOR: u16 = 33;
pub const NEXT: u16 = 34;
pub const END: u16 = 35;
pub const HOME: u16 = 36;
pub const LEFT: u16 = 37;
pub const UP: u16 = 38;
pub const RIGHT: u16 = 39;
pub const DOWN: u16 = 40;
pub const INSERT: u16 = 45;
pub const DELETE: u16 = 46;

pub const DIGIT_0: u16 = 48;
pub const DIGIT_1: u16 = 49;
pub const DIGIT_9: u16 = 57;

pub const A: u16 = 65;
pub const B: u16 = 66;
pub const C: u16 = 67;
pub const D: u16 = 68;
pub const E: u16 = 69;
pub const F: u16 = 70;
pub const G: u16 = 71;
pub const K: u16 = 75;
pub const N: u16 = 78;
pub const P: u16 = 80;
pub const Q: u16 = 81;
pub const V: u16 = 86;
pub const W: u16 = 87;
pub const X: u16 = 88;
pub const Y: u16 = 89;
pub const Z: u16 = 90;

pub const F1: u16 = 112;

pub const OEM_MINUS: u16 = 189;
pub const OEM_2: u16 = 191;

/// Best-effort virtual key for a printable character.
pub fn for_char(c: char) -> u16 {
    match c {
        'a'..='z' => A + (c as u16 - 'a' as u16),
        'A'..='Z' => A + (c as u16 - 'A' as u16),
        '0'..='9' => DIGIT_0 + (c as u16 - '0' as u16),
        ' ' => SPACE,
        '-' | '_' => OEM_MINUS,
        '/' | '?' => OEM_2,
        '\t' => TAB,
        '\r' | '\n' => RETURN,
        '\u{8}' => BACK,
        '\u{1b}' => ESCAPE,
        _ => 0,
    }
}

use core_events::{ControlState, KeyEvent, vk};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};

/// Map a crossterm key event onto the virtual-key model.
///
/// Returns `None` for releases and for key codes without a virtual key
/// (media keys, bare modifiers, lock keys).
pub(crate) fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if matches!(event.kind, CKeyEventKind::Release) {
        return None;
    }
    let mut cs = map_control_state(event.modifiers);
    let (character, virtual_key) = match event.code {
        CKeyCode::Char(c) => {
            if c.is_ascii_uppercase() {
                cs |= ControlState::SHIFT;
            }
            if cs.ctrl() {
                ctrl_char(c)
            } else {
                (c, vk::for_char(c))
            }
        }
        CKeyCode::Enter => ('\r', vk::RETURN),
        CKeyCode::Tab => ('\t', vk::TAB),
        CKeyCode::BackTab => {
            cs |= ControlState::SHIFT;
            ('\t', vk::TAB)
        }
        CKeyCode::Backspace => ('\u{8}', vk::BACK),
        CKeyCode::Esc => ('\u{1b}', vk::ESCAPE),
        CKeyCode::Left => ('\0', vk::LEFT),
        CKeyCode::Right => ('\0', vk::RIGHT),
        CKeyCode::Up => ('\0', vk::UP),
        CKeyCode::Down => ('\0', vk::DOWN),
        CKeyCode::Home => ('\0', vk::HOME),
        CKeyCode::End => ('\0', vk::END),
        CKeyCode::PageUp => ('\0', vk::PRIOR),
        CKeyCode::PageDown => ('\0', vk::NEXT),
        CKeyCode::Insert => ('\0', vk::INSERT),
        CKeyCode::Delete => ('\0', vk::DELETE),
        CKeyCode::F(n @ 1..=24) => ('\0', vk::F1 + u16::from(n) - 1),
        _ => return None,
    };
    Some(KeyEvent::new(character, virtual_key, cs))
}

/// Ctrl + printable key. Terminals deliver Ctrl-_ and Ctrl-/ as the same
/// control byte, which crossterm reports as `'7'`.
fn ctrl_char(c: char) -> (char, u16) {
    match c {
        '_' | '-' | '7' => ('\u{1f}', vk::OEM_MINUS),
        '/' => ('\u{1f}', vk::OEM_2),
        'a'..='z' | 'A'..='Z' => {
            let code = vk::for_char(c);
            (char::from((code - vk::A + 1) as u8), code)
        }
        _ => ('\0', vk::for_char(c)),
    }
}

pub(crate) fn map_control_state(mods: CKeyModifiers) -> ControlState {
    let mut out = ControlState::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= ControlState::LEFT_CTRL;
    }
    if mods.contains(CKeyModifiers::ALT) {
        out |= ControlState::LEFT_ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= ControlState::SHIFT;
    }
    out
}

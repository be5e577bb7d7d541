use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    Top,
    Bottom,
    FocusForm,
    ToggleTokenPrompt,
    Select,
    Delete,
    InputChar(char),
    InputBackspace,
    ClearInput,
    Submit,
    LeaveInput,
    Dismiss,
    Help,
    Quit,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Form,
    Token,
}

impl Focus {
    pub fn is_editing(self) -> bool {
        self != Focus::List
    }
}

pub fn map_key(key: KeyEvent, focus: Focus) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if focus.is_editing() {
        return match key.code {
            KeyCode::Esc => Action::LeaveInput,
            KeyCode::Enter => Action::Submit,
            KeyCode::Backspace => Action::InputBackspace,
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Action::ClearInput
            }
            KeyCode::Char(c) => Action::InputChar(c),
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
        KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
        KeyCode::Char('g') | KeyCode::Home => Action::Top,
        KeyCode::Char('G') | KeyCode::End => Action::Bottom,
        KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Char('/') => Action::FocusForm,
        KeyCode::Char('t') => Action::ToggleTokenPrompt,
        KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Delete => Action::Delete,
        KeyCode::Enter => Action::Select,
        KeyCode::Char('?') => Action::Help,
        KeyCode::Esc => Action::Dismiss,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn letters_are_text_while_editing() {
        assert_eq!(map_key(key(KeyCode::Char('q')), Focus::Form), Action::InputChar('q'));
        assert_eq!(map_key(key(KeyCode::Char('d')), Focus::Token), Action::InputChar('d'));
        assert_eq!(map_key(key(KeyCode::Enter), Focus::Form), Action::Submit);
        assert_eq!(map_key(key(KeyCode::Esc), Focus::Form), Action::LeaveInput);
    }

    #[test]
    fn list_bindings() {
        assert_eq!(map_key(key(KeyCode::Char('q')), Focus::List), Action::Quit);
        assert_eq!(map_key(key(KeyCode::Char('d')), Focus::List), Action::Delete);
        assert_eq!(map_key(key(KeyCode::Enter), Focus::List), Action::Select);
        assert_eq!(map_key(key(KeyCode::Esc), Focus::List), Action::Dismiss);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ev, Focus::Form), Action::Quit);
        assert_eq!(map_key(ev, Focus::List), Action::Quit);
    }

    #[test]
    fn ctrl_u_clears_input() {
        let ev = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ev, Focus::Form), Action::ClearInput);
        assert_eq!(map_key(key(KeyCode::Char('u')), Focus::Form), Action::InputChar('u'));
    }
}

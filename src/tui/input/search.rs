use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;

use crate::tui::app::{App, Mode};

/// Live search: every keystroke refilters the board
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        // Clear the query and leave
        (_, KeyCode::Esc) => {
            app.set_search("");
            app.mode = Mode::Navigate;
        }
        // Keep the filter and leave
        (_, KeyCode::Enter) => app.mode = Mode::Navigate,
        (_, KeyCode::Backspace) => {
            let mut text = app.search_input.clone();
            if let Some((offset, _)) = text.grapheme_indices(true).next_back() {
                text.truncate(offset);
            }
            app.set_search(&text);
        }
        // Ctrl-U clears the prompt
        (m, KeyCode::Char('u')) if m.contains(KeyModifiers::CONTROL) => app.set_search(""),
        (_, KeyCode::Char(c)) => {
            let mut text = app.search_input.clone();
            text.push(c);
            app.set_search(&text);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::tui::app::Mode;
    use crate::tui::input::{press, type_text};
    use crate::tui::render::test_helpers::loaded_app;

    #[test]
    fn typing_filters_from_the_second_character() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode, Mode::Search);
        type_text(&mut app, "v");
        assert_eq!(app.visible_keys(0).len(), 2);
        type_text(&mut app, "a");
        // "va" only matches "Form and validation"
        assert_eq!(app.visible_keys(0), vec!["task0".to_string()]);
        assert!(app.visible_keys(3).is_empty());
    }

    #[test]
    fn enter_keeps_and_escape_clears() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "schema");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.visible_keys(0), vec!["task1".to_string()]);

        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.search_input, "");
        assert_eq!(app.visible_keys(0).len(), 2);
    }

    #[test]
    fn backspace_below_two_characters_shows_everything_again() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "de");
        assert_eq!(app.visible_keys(0).len(), 0);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.search_input, "d");
        assert_eq!(app.visible_keys(0).len(), 2);
    }
}

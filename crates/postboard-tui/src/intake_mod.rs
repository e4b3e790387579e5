use crossterm::event::KeyEvent;
use postboard_core::{Field, Validation, error_text};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::Line,
    widgets::{Paragraph, Wrap},
};

use super::{UiTheme, bordered, rect_contains};
use crate::text_input_mod::{apply_input_key, cursor_line_col, text_char_len};

/// Raw contents of the new-message form plus its inline errors.
#[derive(Debug, Clone)]
pub(crate) struct IntakeForm {
    name: String,
    email: String,
    message: String,
    cursors: [usize; 3],
    focus: Field,
    errors: Validation,
    regions: Vec<(Field, Rect)>,
}

fn slot(field: Field) -> usize {
    match field {
        Field::Name => 0,
        Field::Email => 1,
        Field::Message => 2,
    }
}

impl IntakeForm {
    pub(crate) fn new() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            message: String::new(),
            cursors: [0; 3],
            focus: Field::Name,
            errors: Validation::default(),
            regions: Vec::new(),
        }
    }

    pub(crate) fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_value(&mut self, field: Field, value: &str) {
        *self.value_mut(field) = value.to_string();
        self.cursors[slot(field)] = text_char_len(value);
        self.clear_error(field);
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Message => &mut self.message,
        }
    }

    pub(crate) fn focus(&self) -> Field {
        self.focus
    }

    pub(crate) fn set_focus(&mut self, field: Field) {
        self.focus = field;
    }

    pub(crate) fn focus_next(&mut self) {
        self.focus = match self.focus {
            Field::Name => Field::Email,
            Field::Email => Field::Message,
            Field::Message => Field::Name,
        };
    }

    pub(crate) fn focus_prev(&mut self) {
        self.focus = match self.focus {
            Field::Name => Field::Message,
            Field::Email => Field::Name,
            Field::Message => Field::Email,
        };
    }

    /// Edits the focused field. Any change to the text drops that field's
    /// error right away; the others keep theirs until the next submit.
    pub(crate) fn edit(&mut self, key: KeyEvent) -> bool {
        let field = self.focus;
        let multiline = field == Field::Message;
        let mut cursor = self.cursors[slot(field)];
        let changed = apply_input_key(self.value_mut(field), &mut cursor, key, multiline);
        self.cursors[slot(field)] = cursor;
        if changed {
            self.clear_error(field);
        }
        changed
    }

    /// The three inputs as the intake sees them: trimmed.
    pub(crate) fn trimmed(&self) -> (String, String, String) {
        (
            self.name.trim().to_string(),
            self.email.trim().to_string(),
            self.message.trim().to_string(),
        )
    }

    pub(crate) fn error_line(&self, field: Field) -> Option<&'static str> {
        self.errors.get(field).map(|err| error_text(field, err))
    }

    pub(crate) fn show_errors(&mut self, validation: Validation) {
        self.errors = validation;
    }

    pub(crate) fn clear_error(&mut self, field: Field) {
        match field {
            Field::Name => self.errors.name = None,
            Field::Email => self.errors.email = None,
            Field::Message => self.errors.message = None,
        }
    }

    pub(crate) fn reset(&mut self) {
        let regions = std::mem::take(&mut self.regions);
        *self = Self::new();
        self.regions = regions;
    }

    pub(crate) fn field_at(&self, col: u16, row: u16) -> Option<Field> {
        self.regions
            .iter()
            .find(|(_, rect)| rect_contains(*rect, col, row))
            .map(|(field, _)| *field)
    }
}

pub(crate) fn render_intake_form(
    frame: &mut ratatui::Frame,
    area: Rect,
    form: &mut IntakeForm,
    theme: &UiTheme,
    focused: bool,
) {
    let outer = bordered("NEW MESSAGE", theme, focused);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    form.regions.clear();
    let slots = [
        (Field::Name, rows[0], rows[1]),
        (Field::Email, rows[2], rows[3]),
        (Field::Message, rows[4], rows[5]),
    ];
    for (field, input_area, error_area) in slots {
        let active = focused && form.focus == field;
        let block = bordered(field.label(), theme, active).title_style(if active {
            theme.label_focus
        } else {
            theme.label
        });
        let text_area = block.inner(input_area);
        let value = form.value(field);
        let (line, col) = cursor_line_col(value, form.cursors[slot(field)]);
        let scroll = (line as u16).saturating_sub(text_area.height.saturating_sub(1));
        let mut paragraph = Paragraph::new(value.to_string())
            .style(theme.base)
            .block(block)
            .scroll((scroll, 0));
        if field == Field::Message {
            paragraph = paragraph.wrap(Wrap { trim: false });
        }
        frame.render_widget(paragraph, input_area);
        form.regions.push((field, input_area));

        if let Some(text) = form.error_line(field) {
            frame.render_widget(
                Paragraph::new(Line::from(text)).style(theme.error),
                error_area,
            );
        }

        if active && text_area.width > 0 && text_area.height > 0 {
            let x = text_area.x + (col as u16).min(text_area.width - 1);
            let y = text_area.y + (line as u16 - scroll).min(text_area.height - 1);
            frame.set_cursor_position(Position { x, y });
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use postboard_core::{Field, validate};

    use super::IntakeForm;

    fn type_text(form: &mut IntakeForm, text: &str) {
        for ch in text.chars() {
            form.edit(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = IntakeForm::new();
        type_text(&mut form, " Ann ");
        form.focus_next();
        type_text(&mut form, "a@b.com");
        form.focus_next();
        type_text(&mut form, "hi");
        form.edit(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        type_text(&mut form, "there ");
        assert_eq!(
            form.trimmed(),
            ("Ann".to_string(), "a@b.com".to_string(), "hi\nthere".to_string())
        );
    }

    #[test]
    fn editing_clears_only_that_fields_error() {
        let mut form = IntakeForm::new();
        form.show_errors(validate("", "bad", ""));
        assert!(form.error_line(Field::Name).is_some());

        form.set_focus(Field::Email);
        type_text(&mut form, "x");
        assert_eq!(form.error_line(Field::Email), None);
        assert_eq!(form.error_line(Field::Name), Some("Name is required."));
        assert_eq!(form.error_line(Field::Message), Some("Message is required."));
    }

    #[test]
    fn cursor_keys_keep_errors() {
        let mut form = IntakeForm::new();
        form.show_errors(validate("", "a@b.com", "hi"));
        form.edit(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        assert_eq!(form.error_line(Field::Name), Some("Name is required."));
    }

    #[test]
    fn focus_cycles_both_ways() {
        let mut form = IntakeForm::new();
        form.focus_prev();
        assert_eq!(form.focus(), Field::Message);
        form.focus_next();
        assert_eq!(form.focus(), Field::Name);
    }

    #[test]
    fn reset_empties_everything() {
        let mut form = IntakeForm::new();
        form.set_value(Field::Message, "draft");
        form.set_focus(Field::Message);
        form.show_errors(validate("", "", "draft"));
        form.reset();
        assert_eq!(form.value(Field::Message), "");
        assert_eq!(form.focus(), Field::Name);
        assert!(form.errors.is_valid());
    }
}

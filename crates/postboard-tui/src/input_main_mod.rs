use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use postboard_core::Field;

use super::{App, Focus, Mode, rect_contains};
use crate::board_actions_mod::{
    SubmitOutcome, close_detail, delete_message, open_message, submit_form, toggle_read,
};
use crate::list_render_mod::CardHit;

impl App {
    /// Returns true when the app should quit.
    pub(crate) fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        match self.mode {
            Mode::Detail => {
                self.on_key_detail(key);
                false
            }
            Mode::Board => match self.focus {
                Focus::Form => {
                    self.on_key_form(key);
                    false
                }
                Focus::List => self.on_key_list(key),
            },
        }
    }

    fn on_key_detail(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => self.close_detail(),
            KeyCode::Char('j') | KeyCode::Down => self.detail.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.detail.scroll_up(),
            _ => {}
        }
    }

    fn on_key_form(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') if ctrl => self.submit(),
            KeyCode::F(1) => self.show_help = !self.show_help,
            KeyCode::Esc => self.focus = Focus::List,
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),
            KeyCode::Enter if self.form.focus() != Field::Message => self.form.focus_next(),
            _ => {
                self.form.edit(key);
            }
        }
    }

    fn on_key_list(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('j') | KeyCode::Down => self.list.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.list.select_prev(),
            KeyCode::Char('G') | KeyCode::End => self.list.select_last(),
            KeyCode::Enter => {
                if let Some(id) = self.list.selected_id() {
                    self.open(id);
                }
            }
            KeyCode::Char('r') => {
                if let Some(id) = self.list.selected_id() {
                    self.toggle(id);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.list.selected_id() {
                    self.delete(id);
                }
            }
            KeyCode::Char('i') | KeyCode::Char('n') | KeyCode::Tab | KeyCode::BackTab => {
                self.focus = Focus::Form;
            }
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = !self.show_help,
            _ => {}
        }
        false
    }

    pub(crate) fn on_mouse(&mut self, mouse: MouseEvent) {
        let (col, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {}
            MouseEventKind::ScrollDown => {
                match self.mode {
                    Mode::Detail => self.detail.scroll_down(),
                    Mode::Board => self.list.select_next(),
                }
                return;
            }
            MouseEventKind::ScrollUp => {
                match self.mode {
                    Mode::Detail => self.detail.scroll_up(),
                    Mode::Board => self.list.select_prev(),
                }
                return;
            }
            _ => return,
        }

        if self.mode == Mode::Detail {
            if self.detail.hits_close(col, row) {
                self.close_detail();
            }
            return;
        }

        if let Some(hit) = self.list.hit_test(col, row) {
            self.focus = Focus::List;
            match hit {
                CardHit::ToggleRead(id) => {
                    self.list.select_id(id);
                    self.toggle(id);
                }
                CardHit::Delete(id) => self.delete(id),
                CardHit::Open(id) => self.open(id),
            }
            return;
        }
        if let Some(field) = self.form.field_at(col, row) {
            self.focus = Focus::Form;
            self.form.set_focus(field);
            return;
        }
        if self
            .last_form_area
            .map(|area| rect_contains(area, col, row))
            .unwrap_or(false)
        {
            self.focus = Focus::Form;
        } else if self
            .last_list_area
            .map(|area| rect_contains(area, col, row))
            .unwrap_or(false)
        {
            self.focus = Focus::List;
        }
    }

    fn submit(&mut self) {
        let result = submit_form(
            &mut self.form,
            &mut self.store,
            &mut self.persistence,
            &mut self.list,
        );
        match result {
            Ok(SubmitOutcome::Saved(id)) => self.set_status(format!("Message #{} saved", id)),
            Ok(SubmitOutcome::Rejected(validation)) => {
                if let Some((field, _)) = validation.errors().first() {
                    self.form.set_focus(*field);
                }
            }
            Err(err) => self.report("message", Err(err)),
        }
    }

    fn toggle(&mut self, id: u64) {
        let result = toggle_read(id, &mut self.store, &mut self.persistence, &mut self.list);
        self.report("read state", result);
    }

    fn delete(&mut self, id: u64) {
        let result = delete_message(id, &mut self.store, &mut self.persistence, &mut self.list);
        if result.is_ok() {
            self.set_status(format!("Message #{} deleted", id));
        }
        self.report("delete", result);
    }

    fn open(&mut self, id: u64) {
        let result = open_message(
            id,
            &mut self.store,
            &mut self.persistence,
            &mut self.list,
            &mut self.detail,
        );
        if self.detail.is_open() {
            self.mode = Mode::Detail;
        }
        self.report("read state", result);
    }

    fn close_detail(&mut self) {
        close_detail(&mut self.detail);
        self.mode = Mode::Board;
    }
}

use postboard_core::MessageRecord;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{UiTheme, bordered, rect_contains};

pub(crate) const PLACEHOLDER_TEXT: &str = "No messages.";
const CARD_HEIGHT: u16 = 5;
const BUTTON_GAP: u16 = 2;

/// One rendered card. Holds a copy of what is on screen, so the list can be
/// patched in place without going back to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Card {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) preview: String,
    pub(crate) read: bool,
}

impl Card {
    fn from_record(record: &MessageRecord, preview_cols: usize) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            email: record.email.clone(),
            preview: preview_text(&record.message, preview_cols),
            read: record.read,
        }
    }

    pub(crate) fn toggle_label(&self) -> &'static str {
        if self.read {
            "mark as unread"
        } else {
            "mark as read"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CardHit {
    ToggleRead(u64),
    Delete(u64),
    Open(u64),
}

#[derive(Debug, Clone, Copy)]
struct CardRegion {
    id: u64,
    card: Rect,
    toggle: Rect,
    delete: Rect,
}

pub(crate) struct ListRenderer {
    cards: Vec<Card>,
    selected: usize,
    preview_cols: usize,
    regions: Vec<CardRegion>,
}

impl ListRenderer {
    pub(crate) fn new(preview_cols: usize) -> Self {
        Self {
            cards: Vec::new(),
            selected: 0,
            preview_cols: preview_cols.max(1),
            regions: Vec::new(),
        }
    }

    /// Drops every card and renders one per record, in the given order.
    /// An empty sequence leaves only the placeholder.
    pub(crate) fn rebuild(&mut self, records: &[&MessageRecord]) {
        let keep = self.selected_id();
        self.cards = records
            .iter()
            .map(|record| Card::from_record(record, self.preview_cols))
            .collect();
        self.regions.clear();
        self.selected = keep
            .and_then(|id| self.position(id))
            .unwrap_or(0);
        self.clamp_selection();
    }

    /// Adds a card for a freshly inserted record. The first card replaces
    /// the placeholder.
    pub(crate) fn append(&mut self, record: &MessageRecord) {
        self.cards.push(Card::from_record(record, self.preview_cols));
    }

    /// Updates one card's read state and toggle label without a rebuild.
    pub(crate) fn set_read(&mut self, id: u64, read: bool) -> bool {
        match self.cards.iter_mut().find(|card| card.id == id) {
            Some(card) => {
                card.read = read;
                true
            }
            None => false,
        }
    }

    /// Removes one card without a rebuild; an emptied list falls back to
    /// the placeholder.
    pub(crate) fn remove(&mut self, id: u64) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        self.cards.remove(pos);
        self.regions.retain(|region| region.id != id);
        if pos < self.selected {
            self.selected -= 1;
        }
        self.clamp_selection();
        true
    }

    pub(crate) fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub(crate) fn card_ids(&self) -> Vec<u64> {
        self.cards.iter().map(|card| card.id).collect()
    }

    pub(crate) fn is_placeholder(&self) -> bool {
        self.cards.is_empty()
    }

    pub(crate) fn selected_id(&self) -> Option<u64> {
        self.cards.get(self.selected).map(|card| card.id)
    }

    pub(crate) fn select_next(&mut self) {
        if self.selected + 1 < self.cards.len() {
            self.selected += 1;
        }
    }

    pub(crate) fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.cards.len().saturating_sub(1);
    }

    pub(crate) fn select_id(&mut self, id: u64) {
        if let Some(pos) = self.position(id) {
            self.selected = pos;
        }
    }

    /// Resolves a click against the last drawn frame. Buttons are checked
    /// before the card body, so a button click never also opens the card.
    pub(crate) fn hit_test(&self, col: u16, row: u16) -> Option<CardHit> {
        let region = self
            .regions
            .iter()
            .find(|region| rect_contains(region.card, col, row))?;
        if rect_contains(region.toggle, col, row) {
            Some(CardHit::ToggleRead(region.id))
        } else if rect_contains(region.delete, col, row) {
            Some(CardHit::Delete(region.id))
        } else {
            Some(CardHit::Open(region.id))
        }
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.cards.iter().position(|card| card.id == id)
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.cards.len() {
            self.selected = self.cards.len().saturating_sub(1);
        }
    }
}

/// First non-blank line of the message, cut to `max_cols` display columns.
pub(crate) fn preview_text(message: &str, max_cols: usize) -> String {
    let first = message
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");
    let more_lines = message.trim().lines().count() > 1;
    if first.width() <= max_cols && !more_lines {
        return first.to_string();
    }
    let budget = max_cols.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0usize;
    for ch in first.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str("...");
    out
}

fn button_label(label: &str) -> String {
    format!("[{}]", label)
}

pub(crate) fn render_message_list(
    frame: &mut ratatui::Frame,
    area: Rect,
    list: &mut ListRenderer,
    theme: &UiTheme,
    focused: bool,
) {
    let title = format!("MESSAGES ({})", list.cards.len());
    let outer = bordered(&title, theme, focused);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);
    list.regions.clear();

    if list.cards.is_empty() {
        let hint = Rect {
            x: inner.x + 1,
            y: inner.y,
            width: inner.width.saturating_sub(2),
            height: inner.height.min(1),
        };
        frame.render_widget(Paragraph::new(PLACEHOLDER_TEXT).style(theme.muted), hint);
        return;
    }

    let total = list.cards.len();
    let rows_visible = (inner.height / CARD_HEIGHT).max(1) as usize;
    let mut start = list.selected.saturating_sub(rows_visible.saturating_sub(1));
    if start + rows_visible > total {
        start = total.saturating_sub(rows_visible);
    }
    let end = (start + rows_visible).min(total);

    for (offset, idx) in (start..end).enumerate() {
        let y = inner.y + offset as u16 * CARD_HEIGHT;
        if y + CARD_HEIGHT > inner.y + inner.height {
            break;
        }
        let card_area = Rect {
            x: inner.x,
            y,
            width: inner.width,
            height: CARD_HEIGHT,
        };
        let card = &list.cards[idx];
        let is_selected = idx == list.selected;
        let region = render_card(frame, card_area, card, theme, is_selected && focused);
        list.regions.push(region);
    }
}

fn render_card(
    frame: &mut ratatui::Frame,
    area: Rect,
    card: &Card,
    theme: &UiTheme,
    highlighted: bool,
) -> CardRegion {
    let state_style = if card.read {
        theme.card_read
    } else {
        theme.card_unread
    };
    let mut block_style = theme.base;
    if highlighted {
        block_style = block_style.patch(theme.focus_bg);
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" #{} ", card.id))
        .style(block_style)
        .border_style(if card.read {
            theme.border
        } else {
            theme.border_focus
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let marker = if card.read { "  " } else { "● " };
    let header = Line::from(vec![
        Span::styled(marker, state_style),
        Span::styled(card.name.clone(), state_style),
        Span::styled(format!("  <{}>", card.email), theme.muted),
    ]);
    let toggle = button_label(card.toggle_label());
    let delete = button_label("delete");
    let buttons = Line::from(vec![
        Span::styled(toggle.clone(), theme.button),
        Span::raw(" ".repeat(BUTTON_GAP as usize)),
        Span::styled(delete.clone(), theme.button),
    ]);
    let lines = vec![
        header,
        Line::from(Span::styled(card.preview.clone(), Style::default())),
        buttons,
    ];
    frame.render_widget(Paragraph::new(lines).style(block_style), inner);

    let button_row = inner.y + inner.height.saturating_sub(1);
    let toggle_width = (toggle.width() as u16).min(inner.width);
    let toggle_rect = Rect {
        x: inner.x,
        y: button_row,
        width: toggle_width,
        height: inner.height.min(1),
    };
    let delete_x = inner.x + toggle_width + BUTTON_GAP;
    let delete_rect = Rect {
        x: delete_x,
        y: button_row,
        width: (delete.width() as u16).min((inner.x + inner.width).saturating_sub(delete_x)),
        height: inner.height.min(1),
    };
    CardRegion {
        id: card.id,
        card: area,
        toggle: toggle_rect,
        delete: delete_rect,
    }
}

use postboard_core::MessageRecord;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};

use super::{UiTheme, bordered, centered_rect, rect_contains};

const CLOSE_LABEL: &str = "[close]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DetailContent {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) message: String,
}

/// Modal view of one message. Content is copied in on open, so closing and
/// reopening with another record never shows stale text.
#[derive(Debug, Default)]
pub(crate) struct DetailViewer {
    content: Option<DetailContent>,
    scroll: u16,
    close_region: Option<Rect>,
}

impl DetailViewer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn open(&mut self, record: &MessageRecord) {
        self.content = Some(DetailContent {
            id: record.id,
            name: record.name.clone(),
            email: record.email.clone(),
            message: record.message.clone(),
        });
        self.scroll = 0;
        self.close_region = None;
    }

    pub(crate) fn close(&mut self) {
        self.content = None;
        self.scroll = 0;
        self.close_region = None;
    }

    pub(crate) fn is_open(&self) -> bool {
        self.content.is_some()
    }

    pub(crate) fn content(&self) -> Option<&DetailContent> {
        self.content.as_ref()
    }

    pub(crate) fn scroll_down(&mut self) {
        let max = self
            .content
            .as_ref()
            .map(|c| c.message.lines().count() as u16)
            .unwrap_or(0);
        if self.scroll < max {
            self.scroll += 1;
        }
    }

    pub(crate) fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub(crate) fn hits_close(&self, col: u16, row: u16) -> bool {
        self.close_region
            .map(|rect| rect_contains(rect, col, row))
            .unwrap_or(false)
    }
}

pub(crate) fn render_detail_overlay(
    frame: &mut ratatui::Frame,
    area: Rect,
    detail: &mut DetailViewer,
    theme: &UiTheme,
) {
    let Some(content) = detail.content.as_ref() else {
        return;
    };
    let popup = centered_rect(70, 60, area);
    frame.render_widget(Clear, popup);
    let outer = bordered(&format!("MESSAGE #{}", content.id), theme, true);
    let inner = outer.inner(popup);
    frame.render_widget(outer, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("From:  ", theme.label),
            Span::styled(content.name.clone(), theme.card_unread),
        ])),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Email: ", theme.label),
            Span::raw(content.email.clone()),
        ])),
        rows[1],
    );
    frame.render_widget(
        Paragraph::new("─".repeat(rows[2].width as usize)).style(theme.border),
        rows[2],
    );
    frame.render_widget(
        Paragraph::new(content.message.clone())
            .style(theme.base)
            .wrap(Wrap { trim: false })
            .scroll((detail.scroll, 0)),
        rows[3],
    );
    frame.render_widget(Paragraph::new(CLOSE_LABEL).style(theme.button), rows[4]);
    detail.close_region = Some(Rect {
        x: rows[4].x,
        y: rows[4].y,
        width: (CLOSE_LABEL.len() as u16).min(rows[4].width),
        height: rows[4].height,
    });
}

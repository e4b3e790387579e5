use ratatui::style::{Color, Modifier, Style};

use super::{UiTheme, style_with_colors};

struct Palette {
    base_fg: Option<Color>,
    base_bg: Option<Color>,
    border: Option<Color>,
    bar_fg: Option<Color>,
    bar_bg: Option<Color>,
    accent: Option<Color>,
    error: Option<Color>,
    selection_bg: Option<Color>,
    muted: Option<Color>,
}

impl UiTheme {
    pub(crate) fn from_name(name: &str) -> Self {
        match name {
            "nord" => Self::nord(),
            "gruvbox" => Self::gruvbox(),
            _ => Self::default_theme(),
        }
    }

    fn from_palette(palette: Palette) -> Self {
        let accent = palette.accent.or(palette.base_fg);
        let muted = palette.muted.or(palette.border).or(palette.base_fg);
        Self {
            base: style_with_colors(palette.base_fg, palette.base_bg),
            border: style_with_colors(palette.border, None),
            border_focus: style_with_colors(accent, None),
            bar: style_with_colors(palette.bar_fg, palette.bar_bg),
            focus_bg: style_with_colors(None, palette.selection_bg),
            label: style_with_colors(muted, None),
            label_focus: style_with_colors(accent, None).add_modifier(Modifier::BOLD),
            error: style_with_colors(palette.error, None),
            card_unread: style_with_colors(palette.base_fg, None).add_modifier(Modifier::BOLD),
            card_read: style_with_colors(muted, None),
            button: style_with_colors(accent, None).add_modifier(Modifier::UNDERLINED),
            muted: style_with_colors(muted, None),
        }
    }

    pub(crate) fn default_theme() -> Self {
        Self::from_palette(Palette {
            base_fg: None,
            base_bg: None,
            border: Some(Color::DarkGray),
            bar_fg: Some(Color::Black),
            bar_bg: Some(Color::Gray),
            accent: Some(Color::Cyan),
            error: Some(Color::Red),
            selection_bg: Some(Color::DarkGray),
            muted: Some(Color::Gray),
        })
    }

    fn nord() -> Self {
        Self::from_palette(Palette {
            base_fg: Some(Color::Rgb(0xd8, 0xde, 0xe9)),
            base_bg: Some(Color::Rgb(0x2e, 0x34, 0x40)),
            border: Some(Color::Rgb(0x4c, 0x56, 0x6a)),
            bar_fg: Some(Color::Rgb(0xe5, 0xe9, 0xf0)),
            bar_bg: Some(Color::Rgb(0x3b, 0x42, 0x52)),
            accent: Some(Color::Rgb(0x88, 0xc0, 0xd0)),
            error: Some(Color::Rgb(0xbf, 0x61, 0x6a)),
            selection_bg: Some(Color::Rgb(0x43, 0x4c, 0x5e)),
            muted: Some(Color::Rgb(0x81, 0xa1, 0xc1)),
        })
    }

    fn gruvbox() -> Self {
        Self::from_palette(Palette {
            base_fg: Some(Color::Rgb(0xeb, 0xdb, 0xb2)),
            base_bg: Some(Color::Rgb(0x28, 0x28, 0x28)),
            border: Some(Color::Rgb(0x66, 0x5c, 0x54)),
            bar_fg: Some(Color::Rgb(0xfb, 0xf1, 0xc7)),
            bar_bg: Some(Color::Rgb(0x3c, 0x38, 0x36)),
            accent: Some(Color::Rgb(0xfa, 0xbd, 0x2f)),
            error: Some(Color::Rgb(0xfb, 0x49, 0x34)),
            selection_bg: Some(Color::Rgb(0x50, 0x49, 0x45)),
            muted: Some(Color::Rgb(0xa8, 0x99, 0x84)),
        })
    }
}

#[cfg(test)]
mod tests {
    use ratatui::style::{Color, Modifier};

    use crate::UiTheme;

    #[test]
    fn unknown_name_falls_back_to_default() {
        let theme = UiTheme::from_name("nope");
        assert_eq!(theme.error.fg, Some(Color::Red));
    }

    #[test]
    fn unread_cards_stand_out() {
        for name in ["default", "nord", "gruvbox"] {
            let theme = UiTheme::from_name(name);
            assert!(theme.card_unread.add_modifier.contains(Modifier::BOLD));
            assert!(!theme.card_read.add_modifier.contains(Modifier::BOLD));
        }
    }
}

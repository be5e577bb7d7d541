use crate::ui::input::Focus;
use crate::ui::theme;
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

pub struct StatusBar<'a> {
    pub focus: Focus,
    pub api_base_url: &'a str,
    pub authenticated: bool,
    pub loading: bool,
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        if area.height == 0 {
            return;
        }
        let bg = Style::default().bg(theme::STATUS_BG);
        for x in area.x..area.right() {
            buf[(x, area.y)].set_style(bg);
        }

        let mode = match self.focus {
            Focus::List => " LIST ",
            Focus::Form => " ADD ",
            Focus::Token => " TOKEN ",
        };
        let sep = || {
            Span::styled(
                "\u{2502}",
                Style::default().fg(theme::SEPARATOR).bg(theme::STATUS_BG),
            )
        };

        let mut spans = vec![
            Span::styled(
                mode,
                Style::default()
                    .fg(theme::INPUT_COLOR)
                    .bg(theme::STATUS_BG)
                    .add_modifier(Modifier::BOLD),
            ),
            sep(),
            Span::styled(
                format!(" {} ", self.api_base_url),
                Style::default().bg(theme::STATUS_BG),
            ),
            sep(),
        ];

        if self.authenticated {
            spans.push(Span::styled(
                " token set ",
                Style::default().fg(theme::OK_FG).bg(theme::STATUS_BG),
            ));
        } else {
            spans.push(Span::styled(
                " anonymous ",
                Style::default().fg(theme::DIM_TEXT).bg(theme::STATUS_BG),
            ));
        }

        if self.loading {
            spans.push(sep());
            spans.push(Span::styled(
                " fetching\u{2026} ",
                Style::default().fg(theme::ACCENT).bg(theme::STATUS_BG),
            ));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

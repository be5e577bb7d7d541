use crate::ui::theme;
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

pub struct HeaderBar {
    pub tracked: usize,
}

impl Widget for HeaderBar {
    fn render(self, area: Rect, buf: &mut Buf) {
        if area.height == 0 {
            return;
        }
        let bg = Style::default().bg(theme::HEADER_BG);
        for x in area.x..area.right() {
            buf[(x, area.y)].set_style(bg);
        }

        let left = Line::from(vec![
            Span::styled(
                " \u{f09b} repotrack",
                Style::default()
                    .fg(theme::ACCENT)
                    .bg(theme::HEADER_BG)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                " \u{2503} ",
                Style::default().fg(theme::SEPARATOR).bg(theme::HEADER_BG),
            ),
            Span::styled("My repositories ", Style::default().bg(theme::HEADER_BG)),
            Span::styled(
                format!("({} tracked)", self.tracked),
                Style::default().fg(theme::DIM_TEXT).bg(theme::HEADER_BG),
            ),
        ]);
        buf.set_line(area.x, area.y, &left, area.width);

        let right = "? help ";
        let right_w = UnicodeWidthStr::width(right);
        let area_w = area.width as usize;
        if area_w > right_w {
            let right_x = area.x + (area_w - right_w) as u16;
            let span = Span::styled(right, Style::default().fg(theme::DIM_TEXT).bg(theme::HEADER_BG));
            buf.set_line(right_x, area.y, &Line::from(span), right_w as u16);
        }
    }
}

use crate::ui::{theme, truncate_with_ellipsis};
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Widget},
};
use unicode_width::UnicodeWidthStr;

const DISMISS_HINT: &str = " esc to dismiss ";

/// One-line error banner under the form.
pub struct Banner<'a> {
    pub message: &'a str,
}

impl<'a> Widget for Banner<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        if area.height == 0 || area.width < 4 {
            return;
        }
        Clear.render(area, buf);

        let hint_w = UnicodeWidthStr::width(DISMISS_HINT);
        let show_hint = (area.width as usize) > hint_w + 12;
        let text_w = if show_hint {
            area.width as usize - hint_w
        } else {
            area.width as usize
        };

        let first_line = self.message.lines().next().unwrap_or("");
        let text = truncate_with_ellipsis(&format!(" \u{2717} {first_line}"), text_w);
        let line = Line::from(Span::styled(
            text,
            Style::default()
                .fg(theme::ERROR_FG)
                .add_modifier(Modifier::BOLD),
        ));
        buf.set_line(area.x, area.y, &line, text_w as u16);

        if show_hint {
            let x = area.x + text_w as u16;
            let hint = Span::styled(DISMISS_HINT, Style::default().fg(theme::DIM_TEXT));
            buf.set_line(x, area.y, &Line::from(hint), hint_w as u16);
        }
    }
}

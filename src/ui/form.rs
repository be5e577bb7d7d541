use crate::ui::{tail_fit, theme};
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

const PLACEHOLDER: &str = "Add repository (e.g. rust-lang/rust)";

/// Input box for `owner/repo` with the submit indicator on the right.
pub struct AddForm<'a> {
    pub input: &'a str,
    pub loading: bool,
    pub error: bool,
    pub focused: bool,
}

impl<'a> Widget for AddForm<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        let border = if self.error {
            theme::ERROR_FG
        } else if self.focused {
            theme::ACTIVE_BORDER
        } else {
            theme::INACTIVE_BORDER
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 4 || inner.height == 0 {
            return;
        }

        // submit button: spinner while the lookup runs, plus otherwise
        let button = if self.loading { " \u{25cc} " } else { " + " };
        let button_style = Style::default()
            .fg(theme::HEADER_BG)
            .bg(if self.loading { theme::DIM_TEXT } else { theme::ACCENT })
            .add_modifier(Modifier::BOLD);
        let button_x = inner.right().saturating_sub(3);
        buf.set_line(button_x, inner.y, &Line::from(Span::styled(button, button_style)), 3);

        let text_w = inner.width.saturating_sub(4) as usize;
        let line = if self.input.is_empty() && !self.focused {
            Line::from(Span::styled(
                tail_fit(PLACEHOLDER, text_w),
                Style::default().fg(theme::DIM_TEXT),
            ))
        } else {
            let cursor = if self.focused { "\u{258c}" } else { "" };
            let shown = tail_fit(self.input, text_w.saturating_sub(usize::from(self.focused) + 1));
            Line::from(vec![
                Span::raw(format!(" {shown}")),
                Span::styled(cursor, Style::default().fg(theme::INPUT_COLOR)),
            ])
        };
        buf.set_line(inner.x, inner.y, &line, text_w as u16);
    }
}

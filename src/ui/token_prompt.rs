use crate::ui::theme;
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

const TOKEN_HINT: &str = "generate one at https://github.com/settings/tokens";

/// Shown only while no token is configured. Collapsed it is a one-line hint.
pub struct TokenPrompt<'a> {
    pub expanded: bool,
    pub draft: &'a str,
    pub focused: bool,
}

impl<'a> Widget for TokenPrompt<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        if area.height == 0 {
            return;
        }

        if !self.expanded {
            let line = Line::from(vec![
                Span::styled(
                    " t ",
                    Style::default()
                        .fg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("add GitHub token", Style::default().fg(theme::DIM_TEXT)),
            ]);
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let border = if self.focused {
            theme::ACTIVE_BORDER
        } else {
            theme::INACTIVE_BORDER
        };
        let block = Block::default()
            .title(" GitHub token ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        // never echo the token itself
        let masked = "\u{2022}".repeat(self.draft.chars().count().min(inner.width as usize));
        let line = Line::from(vec![
            Span::raw(" "),
            Span::raw(masked),
            Span::styled(
                if self.focused { "\u{258c}" } else { "" },
                Style::default().fg(theme::INPUT_COLOR),
            ),
        ]);
        buf.set_line(inner.x, inner.y, &line, inner.width);

        if inner.height > 1 {
            let hint = Line::from(Span::styled(
                format!(" enter to save, {TOKEN_HINT}"),
                Style::default().fg(theme::DIM_TEXT),
            ));
            buf.set_line(inner.x, inner.y + 1, &hint, inner.width);
        }
    }
}

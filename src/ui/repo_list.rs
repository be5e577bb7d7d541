use crate::tracker::TrackedRepository;
use crate::ui::{theme, truncate_with_ellipsis};
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

pub struct RepoListView<'a> {
    pub repos: &'a [TrackedRepository],
    pub selected: usize,
    pub scroll: usize,
    pub focused: bool,
}

impl<'a> Widget for RepoListView<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        let border = if self.focused {
            theme::ACTIVE_BORDER
        } else {
            theme::INACTIVE_BORDER
        };
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width < 6 {
            return;
        }

        if self.repos.is_empty() {
            let hint = Span::styled(
                " no repositories yet, press a to add one",
                Style::default().fg(theme::DIM_TEXT),
            );
            buf.set_line(inner.x, inner.y, &Line::from(hint), inner.width);
            return;
        }

        let name_w = inner.width.saturating_sub(5) as usize;
        for (row, (idx, repo)) in self
            .repos
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(inner.height as usize)
            .enumerate()
        {
            let y = inner.y + row as u16;
            let is_selected = idx == self.selected;
            let bg = match (is_selected, self.focused) {
                (true, true) => theme::SELECTED_BG,
                (true, false) => theme::UNFOCUSED_SEL_BG,
                _ => ratatui::style::Color::Reset,
            };
            let style = Style::default().bg(bg);
            for x in inner.x..inner.right() {
                buf[(x, y)].set_style(style);
            }

            let line = Line::from(vec![
                Span::styled(" \u{00d7} ", Style::default().fg(theme::ERROR_FG).bg(bg)),
                Span::styled(truncate_with_ellipsis(&repo.name, name_w), style),
            ]);
            buf.set_line(inner.x, y, &line, inner.width.saturating_sub(2));

            // detail link marker
            let marker = Span::styled("\u{2261}", Style::default().fg(theme::ACCENT).bg(bg));
            buf.set_line(inner.right().saturating_sub(2), y, &Line::from(marker), 1);
        }
    }
}

use crate::tracker::TrackedRepository;
use crate::ui::theme;
use ratatui::{
    buffer::Buffer as Buf,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

pub struct DetailPanel<'a> {
    pub repo: &'a TrackedRepository,
}

impl<'a> Widget for DetailPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buf) {
        let popup = super::centered_rect(60, 30, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(format!(" {} ", self.repo.name))
            .title_style(Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACTIVE_BORDER));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let label_style = Style::default().fg(theme::ACCENT);
        let (owner, name) = self
            .repo
            .name
            .split_once('/')
            .unwrap_or(("", self.repo.name.as_str()));

        let rows = [
            ("Owner ", owner.to_string()),
            ("Name  ", name.to_string()),
            ("URL   ", self.repo.html_url()),
        ];
        for (i, (label, value)) in rows.into_iter().enumerate() {
            if i >= inner.height as usize {
                return;
            }
            let line = Line::from(vec![
                Span::styled(format!(" {label}"), label_style),
                Span::raw(value),
            ]);
            buf.set_line(inner.x, inner.y + i as u16, &line, inner.width);
        }
    }
}

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::presenter::Field;
use crate::ui::Palette;

pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(12),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    let total = app.session().questions().len();
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "TIMED QUIZ",
            Style::default().fg(palette.accent).bold(),
        )),
        Line::from(""),
        Line::from(format!("{} questions · timed answers", total).fg(palette.muted)),
        Line::from(""),
        Line::from(vec![
            Span::styled("Best score: ", Style::default().fg(palette.muted)),
            Span::styled(
                app.view().text(Field::BestScore).to_string(),
                Style::default().fg(palette.correct).bold(),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("ENTER", Style::default().fg(palette.correct).bold()),
            Span::styled(" start   ", Style::default().fg(palette.muted)),
            Span::styled("I", Style::default().fg(palette.selected).bold()),
            Span::styled(" infinite mode", Style::default().fg(palette.muted)),
        ]),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.muted),
    );
    frame.render_widget(widget, chunks[1]);

    let controls = Paragraph::new("t theme  ·  q quit")
        .alignment(Alignment::Center)
        .fg(palette.muted);
    frame.render_widget(controls, chunks[3]);
}

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Row, Table},
};

use crate::app::App;
use crate::models::PlayerAnswer;
use crate::presenter::Field;
use crate::ui::Palette;

const NO_ANSWER: &str = "(no answer)";

pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let view = app.view();
    let chunks = Layout::vertical([
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(
        frame,
        chunks[0],
        view.text(Field::Score),
        view.text(Field::BestScore),
        palette,
    );
    render_summary_table(frame, chunks[1], &view.summary, app.summary_scroll(), palette);
    render_controls(frame, chunks[2], palette);
}

fn render_score_summary(frame: &mut Frame, area: Rect, score: &str, best: &str, palette: &Palette) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(palette.accent).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            score.to_string(),
            Style::default().fg(palette.text).bold(),
        )),
        Line::from(vec![
            Span::styled("Best score: ", Style::default().fg(palette.muted)),
            Span::styled(best.to_string(), Style::default().fg(palette.correct).bold()),
        ]),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(palette.muted),
    );
    frame.render_widget(widget, area);
}

fn render_summary_table(
    frame: &mut Frame,
    area: Rect,
    history: &[PlayerAnswer],
    scroll: usize,
    palette: &Palette,
) {
    let rows: Vec<Row> = history
        .iter()
        .skip(scroll)
        .map(|answer| {
            let chosen_style = if answer.is_correct() {
                Style::default().fg(palette.correct)
            } else {
                Style::default().fg(palette.wrong)
            };
            Row::new(vec![
                Line::from(answer.question_text.clone()).style(Style::default().fg(palette.text)),
                Line::from(answer.chosen_answer_text.as_deref().unwrap_or(NO_ANSWER).to_string())
                    .style(chosen_style),
                Line::from(answer.correct_answer_text.clone())
                    .style(Style::default().fg(palette.correct)),
            ])
        })
        .collect();

    let header = Row::new(vec!["Question", "Your answer", "Correct answer"])
        .style(Style::default().fg(palette.accent).bold())
        .bottom_margin(1);

    let widths = [
        Constraint::Percentage(50),
        Constraint::Percentage(25),
        Constraint::Percentage(25),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.muted)
            .title(" Summary ")
            .title_style(Style::default().fg(palette.accent))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(table, area);
}

fn render_controls(frame: &mut Frame, area: Rect, palette: &Palette) {
    let widget = Paragraph::new("j/k scroll  ·  r restart  ·  t theme  ·  q quit")
        .alignment(Alignment::Center)
        .fg(palette.muted);
    frame.render_widget(widget, area);
}

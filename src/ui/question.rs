use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::{AnswerControl, App};
use crate::presenter::{AnswerMark, Field, Screen};
use crate::ui::Palette;

const URGENT_SECONDS: u32 = 3;

pub fn render(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let view = app.view();
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(5),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let header = Layout::horizontal([Constraint::Fill(1), Constraint::Length(12)]).split(chunks[0]);
    render_progress(frame, header[0], app, palette);
    render_time_left(frame, header[1], view.text(Field::TimeLeft), palette);

    render_question_text(frame, chunks[1], view.text(Field::QuestionText), palette);
    render_answers(frame, chunks[2], &view.answers, view.locked, app.cursor(), palette);
    render_controls(frame, chunks[3], app, palette);
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let view = app.view();
    let progress = match view.screen {
        Screen::Infinite => format!(
            "∞  Round {}  ·  Score {}",
            view.text(Field::QuestionNumber),
            view.text(Field::InfiniteScore)
        ),
        _ => format!(
            "Question {} / {}",
            view.text(Field::QuestionNumber),
            view.text(Field::TotalQuestions)
        ),
    };

    let widget = Paragraph::new(progress).fg(palette.accent).bold();
    frame.render_widget(widget, area);
}

fn render_time_left(frame: &mut Frame, area: Rect, time_left: &str, palette: &Palette) {
    let seconds = time_left.parse::<u32>().unwrap_or(0);
    let color = if seconds <= URGENT_SECONDS {
        palette.urgent
    } else {
        palette.muted
    };

    let widget = Paragraph::new(format!("{}s", time_left))
        .alignment(Alignment::Right)
        .fg(color)
        .bold();
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str, palette: &Palette) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(palette.text)
        .bold()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.muted)
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_answers(
    frame: &mut Frame,
    area: Rect,
    answers: &[AnswerControl],
    locked: bool,
    cursor: usize,
    palette: &Palette,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(answers.len() * 2);

    for (index, answer) in answers.iter().enumerate() {
        let is_selected = !locked && index == cursor;
        let style = match answer.mark {
            Some(AnswerMark::Correct) => Style::default().fg(palette.correct).bold(),
            Some(AnswerMark::Wrong) => Style::default().fg(palette.wrong).bold(),
            None if is_selected => Style::default().fg(palette.selected).bold(),
            None if locked => Style::default().fg(palette.muted),
            None => Style::default().fg(palette.text),
        };
        let marker = match answer.mark {
            Some(AnswerMark::Correct) => "✓",
            Some(AnswerMark::Wrong) => "✗",
            None if is_selected => ">",
            None => " ",
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", index + 1), style),
            Span::styled(answer.text.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.muted)
            .title(" Answers ")
            .title_style(Style::default().fg(palette.accent))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let view = app.view();
    let text = match (view.next_visible, view.screen) {
        (true, Screen::Infinite) => "enter/n next  ·  esc leave  ·  q quit",
        (true, _) => "enter/n next  ·  q quit",
        (false, Screen::Infinite) => "j/k move  ·  enter or 1-9 answer  ·  esc leave  ·  q quit",
        (false, _) => "j/k move  ·  enter or 1-9 answer  ·  q quit",
    };

    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(palette.muted);
    frame.render_widget(widget, area);
}

mod intro;
mod question;
mod result;
mod theme;

use ratatui::{prelude::*, widgets::Block};

use crate::app::App;
use crate::presenter::Screen;

pub use theme::{Palette, Theme};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let palette = app.theme().palette();
    frame.render_widget(Block::default().bg(palette.background), area);

    match app.view().screen {
        Screen::Intro => intro::render(frame, area, app, &palette),
        Screen::Question | Screen::Infinite => question::render(frame, area, app, &palette),
        Screen::Result => result::render(frame, area, app, &palette),
    }
}

use ratatui::style::Color;
use serde::Deserialize;

/// Light or dark colours, toggled at runtime with `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub selected: Color,
    pub correct: Color,
    pub wrong: Color,
    pub urgent: Color,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: Color::Reset,
                text: Color::White,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                selected: Color::Yellow,
                correct: Color::Green,
                wrong: Color::Red,
                urgent: Color::LightRed,
            },
            Theme::Light => Palette {
                background: Color::White,
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                selected: Color::Magenta,
                correct: Color::Green,
                wrong: Color::Red,
                urgent: Color::Red,
            },
        }
    }
}

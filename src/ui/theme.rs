use ratatui::style::Color;

pub const ACCENT: Color = Color::Rgb(140, 115, 200);
pub const HEADER_BG: Color = Color::Rgb(25, 25, 38);
pub const STATUS_BG: Color = Color::Rgb(30, 30, 40);
pub const SELECTED_BG: Color = Color::Rgb(50, 50, 80);
pub const UNFOCUSED_SEL_BG: Color = Color::Rgb(38, 38, 55);
pub const SEPARATOR: Color = Color::Rgb(55, 55, 75);
pub const DIM_TEXT: Color = Color::Rgb(100, 100, 120);
pub const ACTIVE_BORDER: Color = Color::Rgb(120, 120, 180);
pub const INACTIVE_BORDER: Color = Color::Rgb(60, 60, 80);
pub const INPUT_COLOR: Color = Color::Cyan;
pub const ERROR_FG: Color = Color::LightRed;
pub const OK_FG: Color = Color::Green;

use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 120, g: 200, b: 255 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 200, b: 90 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 210, g: 210, b: 210 };

pub const IPV4_ADDR: Color = Color::TrueColor { r: 110, g: 230, b: 160 };
pub const MAC_ADDR: Color = Color::TrueColor { r: 230, g: 150, b: 230 };
pub const HOSTNAME: Color = PRIMARY;
pub const UNRESOLVED: Color = Color::BrightBlack;

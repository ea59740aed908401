use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 102, g: 204, b: 255 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 176, b: 59 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const IPV4_ADDR: Color = Color::TrueColor { r: 120, g: 220, b: 120 };
pub const IPV6_ADDR: Color = Color::TrueColor { r: 86, g: 182, b: 194 };
pub const MAC_ADDR: Color = Color::TrueColor { r: 229, g: 192, b: 123 };

use ratatui::style::Color;

/// Palette used by every screen; switches with the persisted dark-mode flag.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary_bg: Color,
    pub primary_fg: Color,
    pub muted: Color,
    pub border: Color,
    pub accent: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub success: Color,
    pub danger: Color,
}

impl Theme {
    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    fn light() -> Self {
        let selection_bg = hex("#e9ecef");
        Self {
            primary_bg: hex("#ffffff"),
            primary_fg: hex("#000000"),
            muted: hex("#6c757d"),
            border: hex("#ced4da"),
            accent: hex("#333333"),
            selection_fg: contrast_color(&selection_bg, Color::Black),
            selection_bg,
            success: hex("#28a745"),
            danger: hex("#dc3545"),
        }
    }

    fn dark() -> Self {
        let selection_bg = hex("#404040");
        Self {
            primary_bg: hex("#000000"),
            primary_fg: hex("#ffffff"),
            muted: hex("#b3b3b3"),
            border: hex("#555555"),
            accent: hex("#e6e6e6"),
            selection_fg: contrast_color(&selection_bg, Color::White),
            selection_bg,
            success: hex("#00cc66"),
            danger: hex("#ff4444"),
        }
    }
}

fn hex(input: &str) -> Color {
    parse_hex_color(input).unwrap_or(Color::Reset)
}

fn parse_hex_color(input: &str) -> Option<Color> {
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

fn contrast_color(color: &Color, fallback: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let luminance = 0.299 * f64::from(*r) + 0.587 * f64::from(*g) + 0.114 * f64::from(*b);
            if luminance > 186.0 {
                Color::Black
            } else {
                Color::White
            }
        }
        _ => fallback,
    }
}

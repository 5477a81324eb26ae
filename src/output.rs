pub struct Styler {
    color_enabled: bool,
}

impl Styler {
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    fn wrap(&self, code: &str, s: &str) -> String {
        if !self.color_enabled {
            return s.to_string();
        }
        format!("{}{}\u{001b}[0m", code, s)
    }

    pub fn green(&self, s: &str) -> String {
        self.wrap("\u{001b}[32m", s)
    }

    pub fn yellow(&self, s: &str) -> String {
        self.wrap("\u{001b}[33m", s)
    }

    pub fn gray(&self, s: &str) -> String {
        self.wrap("\u{001b}[90m", s)
    }
}

/// Display width of a string. Category icons are emoji, which most
/// terminals render two columns wide; without this, table columns drift.
pub fn display_width(s: &str) -> usize {
    s.chars().map(|c| if is_wide_char(c) { 2 } else { 1 }).sum()
}

fn is_wide_char(c: char) -> bool {
    matches!(c as u32,
        // CJK ideographs, fullwidth forms, Hangul
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2A6DF
        | 0xF900..=0xFAFF
        | 0xFF00..=0xFFEF
        | 0xAC00..=0xD7AF
        // emoji and misc symbols (waste icons live here)
        | 0x1F300..=0x1F9FF
        | 0x2600..=0x26FF
        | 0x2700..=0x27BF
        // block elements used by the streak grid
        | 0x2580..=0x259F)
}

fn pad_right(s: &str, width: usize) -> String {
    let dw = display_width(s);
    if dw >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - dw))
    }
}

pub fn render_simple_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();

    for row in rows.iter() {
        for (i, cell) in row.iter().enumerate() {
            let cell_width = display_width(cell);
            if i >= widths.len() {
                widths.push(cell_width);
            } else {
                widths[i] = widths[i].max(cell_width);
            }
        }
    }

    let render_row = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| pad_right(cell, widths[i]))
            .collect::<Vec<String>>()
            .join("  ")
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut lines = vec![render_row(&header_cells)];
    for row in rows.iter() {
        lines.push(render_row(row));
    }
    lines.join("\n")
}

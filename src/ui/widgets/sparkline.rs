//! Column sparkline for the daily jobs series

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

const BAR_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Vertical bars filling the whole area height, newest value on the right
pub struct ColumnSparkline<'a> {
    data: &'a [u64],
    style: Style,
    empty_style: Style,
}

impl<'a> ColumnSparkline<'a> {
    pub fn new(data: &'a [u64]) -> Self {
        Self {
            data,
            style: Style::default().fg(Color::Cyan),
            empty_style: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// Height of a bar in eighths of a cell
fn scaled_height(value: u64, max: u64, rows: u16) -> u64 {
    let eighths = rows as u64 * 8;
    if max == 0 || value == 0 {
        return 0;
    }
    ((value as f64 / max as f64) * eighths as f64).round().max(1.0) as u64
}

impl<'a> Widget for ColumnSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 || self.data.is_empty() {
            return;
        }

        let max = self.data.iter().copied().max().unwrap_or(0);

        // One column per value; drop the oldest values that do not fit
        let visible = self.data.len().min(area.width as usize);
        let start = self.data.len() - visible;

        for (i, &value) in self.data[start..].iter().enumerate() {
            let x = area.x + i as u16;
            let mut remaining = scaled_height(value, max, area.height);
            for row in (0..area.height).rev() {
                let y = area.y + row;
                let cell = buf.get_mut(x, y);
                if remaining >= 8 {
                    cell.set_char(BAR_CHARS[7]).set_style(self.style);
                    remaining -= 8;
                } else if remaining > 0 {
                    cell.set_char(BAR_CHARS[remaining as usize - 1]).set_style(self.style);
                    remaining = 0;
                } else if row == area.height - 1 {
                    cell.set_char('·').set_style(self.empty_style);
                }
            }
        }
    }
}

/// Single-line rendering of a series, for narrow layouts
pub fn sparkline_text(data: &[u64], width: usize) -> String {
    if data.is_empty() {
        return String::new();
    }

    let max = data.iter().copied().max().unwrap_or(0);
    let visible = data.len().min(width);
    data[data.len() - visible..]
        .iter()
        .map(|&value| match scaled_height(value, max, 1) {
            0 => ' ',
            h => BAR_CHARS[(h as usize - 1).min(7)],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparkline_text_keeps_newest() {
        let data = [0, 1, 2, 3, 4, 5, 6, 7, 8];
        let text = sparkline_text(&data, 4);
        assert_eq!(text.chars().count(), 4);
        assert_eq!(text.chars().last(), Some('█'));
        assert!(sparkline_text(&[], 8).is_empty());
    }

    #[test]
    fn test_zero_stays_blank() {
        assert_eq!(sparkline_text(&[0, 0], 2), "  ");
        assert_eq!(scaled_height(1, 100, 1), 1);
    }

    #[test]
    fn test_render_fills_column() {
        let area = Rect::new(0, 0, 2, 2);
        let mut buf = Buffer::empty(area);
        ColumnSparkline::new(&[2, 1]).render(area, &mut buf);
        assert_eq!(buf.get(0, 0).symbol(), "█");
        assert_eq!(buf.get(0, 1).symbol(), "█");
        assert_eq!(buf.get(1, 1).symbol(), "█");
        assert_eq!(buf.get(1, 0).symbol(), " ");
    }
}

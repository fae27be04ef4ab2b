//! Live BBS preview driven entirely by a `PreviewStyle`.
//!
//! Border, glow and banner are drawn only when the corresponding style
//! property asks for them, so the pane always reflects the last apply.

use crate::core::PreviewStyle;
use crate::theme::{ColorField, HexColor};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

const BANNER: [&str; 5] = [
    r" ____  ____  ____  ",
    r"| __ )| __ )/ ___| ",
    r"|  _ \|  _ \\___ \ ",
    r"| |_) | |_) |___) |",
    r"|____/|____/|____/ ",
];

const MENU: [(&str, &str); 5] = [
    ("M", "Message Boards"),
    ("F", "File Library"),
    ("D", "Door Games"),
    ("W", "Who's Online"),
    ("G", "Goodbye"),
];

/// Glow strength used when the shadow option is on
const GLOW_DIM: f32 = 0.25;

pub struct PreviewPane<'a> {
    style: &'a PreviewStyle,
    theme_name: &'a str,
}

impl<'a> PreviewPane<'a> {
    pub fn new(style: &'a PreviewStyle, theme_name: &'a str) -> Self {
        Self { style, theme_name }
    }

    fn color(&self, field: ColorField) -> HexColor {
        self.style
            .color(field)
            .unwrap_or(HexColor::from_u32(0x000000))
    }

    fn content_lines(&self) -> Vec<Line<'a>> {
        let text = Style::default().fg(self.color(ColorField::Text).to_ratatui());
        let accent = Style::default()
            .fg(self.color(ColorField::Accent).to_ratatui())
            .add_modifier(Modifier::BOLD);

        let mut lines = Vec::new();
        if self.style.is_monospace() {
            lines.extend(BANNER.iter().map(|row| Line::from(Span::styled(*row, accent))));
        } else {
            lines.push(Line::from(Span::styled("Welcome to the BBS", accent)));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Main Menu", text.add_modifier(Modifier::UNDERLINED))));
        for (key, label) in MENU {
            lines.push(Line::from(vec![
                Span::styled(format!("[{}] ", key), accent),
                Span::styled(label, text),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Node 1 | 2400 baud | ", text),
            Span::styled(self.theme_name.to_string(), accent),
        ]));
        lines.push(Line::from(Span::styled("Command: _", text)));
        lines
    }
}

impl Widget for PreviewPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let bg = self.color(ColorField::Bg).to_ratatui();
        let mut inner_area = area;

        if self.style.has_shadow() && area.width > 2 && area.height > 2 {
            let glow = self.color(ColorField::Accent).dimmed(GLOW_DIM).to_ratatui();
            buf.set_style(area, Style::default().bg(glow));
            inner_area = Rect {
                x: area.x + 1,
                y: area.y + 1,
                width: area.width - 2,
                height: area.height - 2,
            };
        }

        buf.set_style(inner_area, Style::default().bg(bg));

        let mut block = Block::default().style(Style::default().bg(bg));
        if self.style.has_border() {
            block = block
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(self.color(ColorField::Border).to_ratatui()))
                .title(" BBS Preview ");
        }
        let content_area = block.inner(inner_area);
        block.render(inner_area, buf);

        Paragraph::new(self.content_lines())
            .style(Style::default().bg(bg))
            .render(content_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DisplayOptions;
    use crate::theme::ThemeCatalog;
    use ratatui::style::Color;

    fn render(options: DisplayOptions) -> Buffer {
        let mut style = PreviewStyle::default();
        style.apply(&ThemeCatalog::get(2).unwrap().colors, &options);
        let area = Rect::new(0, 0, 40, 18);
        let mut buf = Buffer::empty(area);
        PreviewPane::new(&style, "Blue Screen").render(area, &mut buf);
        buf
    }

    #[test]
    fn test_border_only_when_enabled() {
        let plain = render(DisplayOptions::default());
        assert_ne!(plain[(0, 0)].symbol(), "╔");

        let bordered = render(DisplayOptions {
            enable_border: true,
            ..DisplayOptions::default()
        });
        assert_eq!(bordered[(0, 0)].symbol(), "╔");
        assert_eq!(bordered[(0, 0)].fg, Color::Rgb(0xc0, 0xc0, 0xc0));
    }

    #[test]
    fn test_shadow_frames_with_accent_glow() {
        let buf = render(DisplayOptions {
            enable_shadow: true,
            ..DisplayOptions::default()
        });
        let glow = HexColor::from_u32(0xffff00).dimmed(GLOW_DIM).to_ratatui();
        assert_eq!(buf[(0, 0)].bg, glow);
        assert_eq!(buf[(1, 1)].bg, Color::Rgb(0x00, 0x00, 0x80));
    }

    #[test]
    fn test_font_switches_banner() {
        let banner = render(DisplayOptions::default());
        let first_row: String = (0..20).map(|x| banner[(x, 0)].symbol().to_string()).collect();
        assert!(first_row.contains("____"));

        let plain = render(DisplayOptions {
            pixel_font: false,
            ..DisplayOptions::default()
        });
        let first_row: String = (0..20).map(|x| plain[(x, 0)].symbol().to_string()).collect();
        assert!(first_row.starts_with("Welcome to the BBS"));
    }
}

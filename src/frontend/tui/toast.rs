//! Notification overlay anchored to the top-right corner.

use crate::core::notification::{Toast, ToastPhase};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Clear, Paragraph, Widget},
};

const TOAST_BG: Color = Color::Rgb(0x00, 0xff, 0x00);
const TOAST_FG: Color = Color::Black;
const MARGIN: u16 = 2;

pub struct ToastStack<'a> {
    toasts: &'a [Toast],
}

impl<'a> ToastStack<'a> {
    pub fn new(toasts: &'a [Toast]) -> Self {
        Self { toasts }
    }
}

impl Widget for ToastStack<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Newest on top
        for (row, toast) in self.toasts.iter().rev().enumerate() {
            let y = area.y + 1 + row as u16;
            if y >= area.bottom() {
                break;
            }

            let text = format!(" {} ", toast.message);
            let width = (text.chars().count() as u16).min(area.width.saturating_sub(MARGIN));
            if width == 0 {
                continue;
            }

            // Off-screen halves stand in for the slide in/out transition
            let slide = match toast.phase {
                ToastPhase::Shown => 0,
                ToastPhase::Entering | ToastPhase::Leaving => width / 2,
            };
            let x = (area.right().saturating_sub(width + MARGIN) + slide).max(area.x);
            let visible_width = width.min(area.right().saturating_sub(x));
            let toast_area = Rect::new(x, y, visible_width, 1);

            Clear.render(toast_area, buf);
            Paragraph::new(text)
                .style(
                    Style::default()
                        .fg(TOAST_FG)
                        .bg(TOAST_BG)
                        .add_modifier(Modifier::BOLD),
                )
                .render(toast_area, buf);
        }
    }
}

//! Main editor screen: controls on the left, live preview on the right.

use super::preview_pane::PreviewPane;
use super::toast::ToastStack;
use crate::core::AppCore;
use crate::data::{EditorButton, Focus, OptionToggle, FOCUS_ORDER};
use crate::theme::ColorField;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

const CONTROLS_WIDTH: u16 = 36;

fn focused_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn section(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}

pub fn draw(f: &mut Frame, app: &AppCore, fullscreen: bool) {
    let area = f.area();
    let controller = &app.controller;
    let preview = PreviewPane::new(controller.preview(), &controller.current_theme().name);

    if fullscreen {
        f.render_widget(preview, area);
    } else {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(CONTROLS_WIDTH), Constraint::Min(0)])
            .split(rows[0]);

        draw_controls(f, app, columns[0]);
        f.render_widget(preview, columns[1]);
        draw_help(f, rows[1]);
    }

    f.render_widget(ToastStack::new(controller.notifier().toasts()), area);
}

fn draw_controls(f: &mut Frame, app: &AppCore, area: Rect) {
    let list_height = app.controller.theme_list().entries().len() as u16 + 3;
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(list_height),
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    draw_theme_list(f, app, parts[0]);
    draw_colors(f, app, parts[1]);
    draw_options(f, app, parts[2]);
    draw_buttons(f, app, parts[3]);
}

fn draw_theme_list(f: &mut Frame, app: &AppCore, area: Rect) {
    let focus = app.ui_state.focus;
    let list = app.controller.theme_list();
    let block = section("Themes", matches!(focus, Focus::ThemeList | Focus::Search));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::new();
    let search_focused = focus == Focus::Search;
    let cursor = if search_focused { "_" } else { "" };
    lines.push(Line::from(vec![
        Span::styled("Search: ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{}{}", app.ui_state.search_input, cursor),
            focused_style(search_focused),
        ),
    ]));

    for index in list.visible_indices() {
        let entry = &list.entries()[index];
        let is_selected = index == list.selected();
        let is_cursor = focus == Focus::ThemeList && index == app.ui_state.list_cursor;
        let prefix = if is_selected { "● " } else { "  " };

        let style = if is_cursor {
            focused_style(true)
        } else if is_selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(format!("{}{}", prefix, entry.name), style)));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_colors(f: &mut Frame, app: &AppCore, area: Rect) {
    let focus = app.ui_state.focus;
    let block = section("Colors", matches!(focus, Focus::Color(_)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let inputs = app.controller.color_inputs();
    let lines: Vec<Line> = ColorField::ALL
        .iter()
        .map(|field| {
            let focused = focus == Focus::Color(*field);
            let committed = inputs.get(*field);
            let value = match app.ui_state.draft_for(*field) {
                Some(draft) => format!("{}_", draft),
                None => committed.to_hex(),
            };
            Line::from(vec![
                Span::styled(format!("{:<11}", field.label()), Style::default().fg(Color::Gray)),
                Span::styled(format!("{:<9}", value), focused_style(focused)),
                Span::raw(" "),
                Span::styled("   ", Style::default().bg(committed.to_ratatui())),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_options(f: &mut Frame, app: &AppCore, area: Rect) {
    let focus = app.ui_state.focus;
    let block = section("Options", matches!(focus, Focus::Option(_)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let options = app.controller.options();
    let toggles = [
        (OptionToggle::Border, options.enable_border),
        (OptionToggle::Shadow, options.enable_shadow),
        (OptionToggle::PixelFont, options.pixel_font),
    ];
    let lines: Vec<Line> = toggles
        .iter()
        .map(|(toggle, checked)| {
            let mark = if *checked { "[x]" } else { "[ ]" };
            Line::from(Span::styled(
                format!("{} {}", mark, toggle.label()),
                focused_style(focus == Focus::Option(*toggle)),
            ))
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_buttons(f: &mut Frame, app: &AppCore, area: Rect) {
    let focus = app.ui_state.focus;
    let block = section("Actions", matches!(focus, Focus::Button(_)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut spans = Vec::new();
    for slot in FOCUS_ORDER {
        if let Focus::Button(button) = slot {
            spans.push(Span::styled(
                format!("[{}]", short_label(button)),
                focused_style(focus == slot),
            ));
            spans.push(Span::raw(" "));
        }
    }

    f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn short_label(button: EditorButton) -> &'static str {
    match button {
        EditorButton::Fullscreen => "Full",
        other => other.label(),
    }
}

fn draw_help(f: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Yellow);
    let help = Line::from(vec![
        Span::styled(" Tab", key),
        Span::raw(": Focus  "),
        Span::styled("Enter", key),
        Span::raw(": Select  "),
        Span::styled("/", key),
        Span::raw(": Search  "),
        Span::styled("a/e/r", key),
        Span::raw(": Apply/Export/Reset  "),
        Span::styled("y", key),
        Span::raw(": Copy JSON  "),
        Span::styled("d", key),
        Span::raw(": Dismiss  "),
        Span::styled("F11", key),
        Span::raw(": Fullscreen  "),
        Span::styled("q", key),
        Span::raw(": Quit"),
    ]);
    f.render_widget(Paragraph::new(help).style(Style::default().fg(Color::Gray)), area);
}

//! Rendering of the form, prompts and popups.

use pptpdf_core::PresentationApp;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::app::{App, Mode, Popup, PopupKind, Prompt, ACTIONS};

const FORM_WIDTH: u16 = 60;

pub fn draw<A: PresentationApp>(frame: &mut Frame, app: &App<A>) {
    let form = centered_rect(FORM_WIDTH, 14, frame.area());
    frame.render_widget(Clear, form);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" PPTX to PDF Converter ");
    let inner = block.inner(form);
    frame.render_widget(block, form);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(2),
            Constraint::Length(1),
        ])
        .split(inner);

    for (idx, label) in ACTIONS.iter().enumerate() {
        draw_button(frame, rows[idx], label, app, idx);
    }

    let status = Paragraph::new(app.status.as_str())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(status, rows[2]);

    frame.render_widget(Paragraph::new(footer(&app.mode)), rows[3]);

    match &app.mode {
        Mode::Input(prompt) => draw_prompt(frame, prompt, &app.input_buffer),
        Mode::Popup(popup) => draw_popup(frame, popup),
        Mode::Menu | Mode::Busy(_) => {}
    }
}

fn draw_button<A: PresentationApp>(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    app: &App<A>,
    idx: usize,
) {
    let style = if app.is_busy() {
        Style::default().fg(Color::DarkGray)
    } else if idx == app.selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let button = Paragraph::new(Line::from(format!("{}. {}", idx + 1, label)).centered())
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, area);
}

fn footer(mode: &Mode) -> Line<'static> {
    let hints = match mode {
        Mode::Menu => "Up/Down select  Enter run  1/2 shortcut  q quit",
        Mode::Input(_) => "Enter confirm  Esc cancel  Ctrl-u clear",
        Mode::Busy(_) => "Working...",
        Mode::Popup(Popup {
            kind: PopupKind::OfferOpen(_),
            ..
        }) => "y open folder  n close",
        Mode::Popup(_) => "Enter close",
    };
    Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)))
}

fn draw_prompt(frame: &mut Frame, prompt: &Prompt, buffer: &str) {
    let area = centered_rect(FORM_WIDTH + 10, 5, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", prompt.title()))
        .border_style(Style::default().fg(Color::Yellow));
    let text = Text::from(vec![
        Line::from("Path:"),
        Line::from(vec![
            Span::raw(buffer.to_string()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
    ]);
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_popup(frame: &mut Frame, popup: &Popup) {
    let height = popup.body.lines().count() as u16 + 4;
    let area = centered_rect(FORM_WIDTH + 10, height, frame.area());
    frame.render_widget(Clear, area);

    let color = match popup.kind {
        PopupKind::OfferOpen(_) => Color::Green,
        PopupKind::Error => Color::Red,
        PopupKind::Warning => Color::Yellow,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", popup.title))
        .border_style(Style::default().fg(color));
    let body = Paragraph::new(popup.body.as_str())
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(body, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

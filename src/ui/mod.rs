use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;
pub mod tabs;
pub mod widgets;

use crate::app::{App, InputMode, StatusLevel};
use crate::domain::Tab;
use crate::view::Tone;

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.size();
    let areas = layout::areas(size, app.active_tab());

    draw_header(f, areas.header, app);
    tabs::draw_tab_bar(f, areas.tab_bar, app);
    tabs::draw_body(f, &areas, app);
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size, app);
    }
}

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Neutral => Color::Gray,
        Tone::Info => Color::LightBlue,
        Tone::Success => Color::LightGreen,
        Tone::Warning => Color::LightYellow,
        Tone::Accent => Color::LightMagenta,
        Tone::Danger => Color::LightRed,
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let title = Line::from(vec![
        Span::styled(
            "Garage Dashboard",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Company ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.controller.company().unwrap_or("all").to_string()),
    ]);
    f.render_widget(Paragraph::new(title), chunks[0]);

    let activity = if app.controller.is_busy() {
        Span::styled("● loading", Style::default().fg(Color::LightYellow))
    } else if app.controller.last_error().is_some() {
        Span::styled("● error", Style::default().fg(Color::LightRed))
    } else {
        Span::styled("● idle", Style::default().fg(Color::Green))
    };
    let right = Line::from(vec![
        Span::styled(app.backend.clone(), Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        activity,
    ]);
    f.render_widget(Paragraph::new(right).alignment(Alignment::Right), chunks[1]);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let tab = app.active_tab();
    let mut spans = vec![
        Span::styled("Tab ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", tab.title())),
    ];
    if tab != Tab::Dashboard {
        let summary = app.controller.filters(tab).summary();
        spans.push(Span::styled("Filter ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(if summary.is_empty() {
            "none  ".to_string()
        } else {
            format!("{summary}  ")
        }));
    }
    if let Some(container) = app.controller.screen().containers.get(app.focused_container) {
        spans.push(Span::styled("List ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::raw(format!("{}  ", container.title)));
    }
    let next_refresh = app
        .controller
        .timer()
        .remaining(std::time::Instant::now())
        .map(|left| format!("{}s", left.as_secs()))
        .unwrap_or_else(|| "--".to_string());
    spans.push(Span::styled("Auto refresh ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::raw(next_refresh));

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left);
    f.render_widget(paragraph, area);
}

/// Get command hint for autocompletion
fn command_hint(input: &str) -> Option<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    let commands = [
        ("tab", "tab <dashboard|jobs|appointments|inspections|sales>"),
        ("status", "status <value>, empty clears"),
        ("from", "from <YYYY-MM-DD>"),
        ("to", "to <YYYY-MM-DD>"),
        ("jobcard", "jobcard yes|no|any (Inspections)"),
        ("clear", "Clear filters on this tab"),
        ("company", "company <name>, empty clears"),
        ("refresh", "Reload the active tab"),
        ("open", "open <job|appointment|inspection|vehicle|quotation|invoice> <name>"),
        ("new", "new <job|appointment|vehicle|inspection>"),
        ("list", "list <jobs|vehicles|reports|invoices>"),
        ("help", "Show key bindings"),
        ("quit", "Exit"),
    ];

    let word = input.split_whitespace().next().unwrap_or_default();
    commands
        .iter()
        .find(|(cmd, _)| cmd.starts_with(word))
        .map(|(_, desc)| *desc)
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = match app.input_mode {
        InputMode::Command => {
            let hint_text = command_hint(&app.command.input)
                .unwrap_or("tab, status, from, to, company, open, new, list…");
            Line::from(vec![
                Span::styled(": ", Style::default().fg(Color::Yellow)),
                Span::raw(app.command.input.as_str()),
                Span::styled(
                    format!("  {}", hint_text),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        }
        InputMode::Normal => {
            if let Some((text, level)) = app.status_text() {
                let color = match level {
                    StatusLevel::Info => Color::LightGreen,
                    StatusLevel::Warn => Color::LightYellow,
                    StatusLevel::Error => Color::LightRed,
                };
                Line::from(vec![
                    Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(text, Style::default().fg(color)),
                ])
            } else {
                action_hints(app)
            }
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}

fn action_hints(app: &App) -> Line<'static> {
    let mut hints = vec![
        ("1-5", "tabs"),
        ("j/k", "move"),
        ("h/l", "list"),
        ("Enter", "open"),
        ("r", "refresh"),
    ];
    match app.active_tab() {
        Tab::Dashboard => {}
        Tab::Inspections => {
            hints.extend([("s", "status"), ("J", "job card"), ("c", "clear")])
        }
        _ => hints.extend([("s", "status"), ("c", "clear")]),
    }
    hints.extend([(":", "command"), ("?", "help"), ("q", "quit")]);

    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(
            format!(" {label}  "),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn draw_help_popup(f: &mut Frame, area: Rect, app: &App) {
    let popup_area = centered_rect(64, 70, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Navigation"),
        Line::from("  1-5        Dashboard / Jobs / Appointments / Inspections / Sales"),
        Line::from("  Tab        Next / previous tab (Shift-Tab)"),
        Line::from("  h / l      Previous / next list"),
        Line::from("  j / k      Move selection"),
        Line::from("  Enter      Open selected record"),
        Line::from(""),
        Line::from("Filters"),
        Line::from("  s          Cycle status filter"),
        Line::from("  J          Cycle job card filter (Inspections)"),
        Line::from("  c          Clear filters on this tab"),
        Line::from(""),
        Line::from("Actions"),
        Line::from("  r          Refresh"),
        Line::from("  :          Command line"),
        Line::from("  ?          Toggle help"),
        Line::from("  q          Quit"),
        Line::from(""),
        Line::from("Commands:"),
        Line::from("  :status In Progress   :from 2025-01-01   :jobcard no"),
        Line::from("  :company Main Garage  :open job JC-0001  :new appointment"),
        Line::from("  :list jobs            :list invoices     :list reports"),
        Line::from(""),
        Line::from(format!(
            "Auto refresh every {}s, filters {}",
            app.controller.timer().period().as_secs(),
            match app.controller.policy() {
                crate::domain::FilterPolicy::Persist => "kept across tabs",
                crate::domain::FilterPolicy::ResetOnSwitch => "reset on tab switch",
            }
        )),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

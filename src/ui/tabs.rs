//! Tab bar and per-tab bodies

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Gauge, List, ListItem, ListState, Paragraph,
    Tabs as RataTabs, Wrap,
};
use ratatui::Frame;

use super::layout::{container_cells, UiAreas};
use super::tone_color;
use super::widgets::{sparkline_text, ColumnSparkline};
use crate::app::App;
use crate::domain::Tab;
use crate::view::format::{format_count, status_tone, truncate_str};
use crate::view::{Container, DashboardWidgets, FilterBar, KpiCard, Panel, RowView, Tone};

const BAR_SCALE: u64 = 1_000_000;

/// Draw the tab bar with per-tab badge counts
pub fn draw_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            let mut spans = vec![
                Span::styled(
                    format!("{}:", tab.shortcut()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(tab.title()),
            ];
            if let Some(count) = app.controller.tab_count(*tab) {
                spans.push(Span::styled(
                    format!(" {}", format_count(count)),
                    Style::default().fg(Color::LightYellow),
                ));
            }
            Line::from(spans)
        })
        .collect();

    let selected = Tab::ALL
        .iter()
        .position(|t| *t == app.active_tab())
        .unwrap_or(0);

    let tabs = RataTabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ");

    f.render_widget(tabs, area);
}

/// Draw everything between the tab bar and the status line
pub fn draw_body(f: &mut Frame, areas: &UiAreas, app: &App) {
    let screen = app.controller.screen();

    if let Some(widgets) = screen.widgets.as_ref() {
        draw_kpi_cards(f, areas.strip, &widgets.kpis);
        if let Some(charts) = areas.charts {
            draw_charts(f, charts, widgets);
        }
    } else if let Some(bar) = screen.filter_bar.as_ref() {
        draw_filter_bar(f, areas.strip, bar);
    }

    let cells = container_cells(areas.body, screen.containers.len());
    for (index, (container, cell)) in screen.containers.iter().zip(cells).enumerate() {
        let focused = index == app.focused_container;
        let selected = focused.then_some(app.selected_row);
        draw_container(f, cell, container, selected);
    }
}

fn draw_kpi_cards(f: &mut Frame, area: Rect, cards: &[KpiCard]) {
    if cards.is_empty() {
        return;
    }
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, cards.len() as u32); cards.len()])
        .split(area);

    for (card, column) in cards.iter().zip(columns.iter()) {
        let color = tone_color(card.tone);
        let lines = vec![
            Line::from(Span::styled(
                card.value.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(card.label, Style::default().fg(Color::DarkGray))),
        ];
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        f.render_widget(paragraph, *column);
    }
}

fn draw_charts(f: &mut Frame, area: Rect, widgets: &DashboardWidgets) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Percentage(35),
            Constraint::Percentage(20),
        ])
        .split(area);

    // Daily jobs
    let block = Block::default()
        .title(" Daily Jobs (30 days) ")
        .borders(Borders::ALL);
    let inner = block.inner(columns[0]);
    f.render_widget(block, columns[0]);
    match &widgets.daily_jobs {
        Panel::Ready(points) => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(inner);
            let counts: Vec<u64> = points.iter().map(|(_, count)| *count).collect();
            let style = Style::default().fg(tone_color(Tone::Info));
            if rows[0].height < 2 {
                let line = sparkline_text(&counts, rows[0].width as usize);
                f.render_widget(Paragraph::new(line).style(style), rows[0]);
            } else {
                f.render_widget(ColumnSparkline::new(&counts).style(style), rows[0]);
            }
            let first = points.first().map(|(label, _)| label.as_str()).unwrap_or_default();
            let last = points.last().map(|(label, _)| label.as_str()).unwrap_or_default();
            let total = counts.iter().copied().fold(0u64, u64::saturating_add);
            let caption = Line::from(vec![
                Span::styled(format!("{first} → {last}"), Style::default().fg(Color::DarkGray)),
                Span::raw(format!("  total {}", format_count(total))),
            ]);
            f.render_widget(Paragraph::new(caption), rows[1]);
        }
        other => draw_placeholder(f, inner, other),
    }

    // Job status distribution
    let block = Block::default().title(" Job Status ").borders(Borders::ALL);
    let inner = block.inner(columns[1]);
    f.render_widget(block, columns[1]);
    match &widgets.status_mix {
        Panel::Ready(statuses) => {
            let counts: Vec<u64> = statuses.iter().map(|(_, count)| *count).collect();
            let bars: Vec<Bar> = statuses
                .iter()
                .zip(bar_lengths(&counts))
                .map(|((status, count), length)| {
                    Bar::default()
                        .label(Line::from(truncate_str(status, 12)))
                        .value(length)
                        .text_value(format_count(*count))
                        .style(Style::default().fg(tone_color(status_tone(status))))
                })
                .collect();
            let chart = BarChart::default()
                .direction(Direction::Horizontal)
                .bar_width(1)
                .bar_gap(0)
                .data(BarGroup::default().bars(&bars));
            f.render_widget(chart, inner);
        }
        other => draw_placeholder(f, inner, other),
    }

    // Today's tasks
    let block = Block::default().title(" Today's Tasks ").borders(Borders::ALL);
    let inner = block.inner(columns[2]);
    f.render_widget(block, columns[2]);
    match &widgets.tasks {
        Panel::Ready((completed, total, percent)) => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
                .split(inner);
            f.render_widget(
                Paragraph::new(format!("{completed} of {total} done")),
                rows[0],
            );
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
                .percent((*percent).min(100));
            f.render_widget(gauge, rows[1]);
        }
        other => draw_placeholder(f, inner, other),
    }
}

/// Bar values rescaled so the widget's arithmetic stays in range
fn bar_lengths(counts: &[u64]) -> Vec<u64> {
    let max = counts.iter().copied().max().unwrap_or(0);
    if max <= BAR_SCALE {
        return counts.to_vec();
    }
    counts
        .iter()
        .map(|count| ((*count as f64 / max as f64) * BAR_SCALE as f64).round() as u64)
        .collect()
}

fn draw_filter_bar(f: &mut Frame, area: Rect, bar: &FilterBar) {
    let mut spans = Vec::new();
    for (field, value) in &bar.fields {
        spans.push(Span::styled(
            format!("{} ", field.label()),
            Style::default().fg(Color::DarkGray),
        ));
        if value.is_empty() {
            spans.push(Span::styled("any", Style::default().fg(Color::Gray)));
        } else {
            spans.push(Span::styled(
                value.clone(),
                Style::default()
                    .fg(Color::LightCyan)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        spans.push(Span::raw("   "));
    }
    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Filters (s status, c clear, : from/to) ")
            .borders(Borders::ALL),
    );
    f.render_widget(paragraph, area);
}

fn draw_container(f: &mut Frame, area: Rect, container: &Container, selected: Option<usize>) {
    let border = if selected.is_some() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let count = container.rows().len();
    let title = if count > 0 {
        format!(" {} ({}) ", container.title, count)
    } else {
        format!(" {} ", container.title)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border);

    match &container.state {
        Panel::Ready(rows) => {
            let width = area.width.saturating_sub(4) as usize;
            let items: Vec<ListItem> = rows.iter().map(|row| row_item(row, width)).collect();
            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().bg(Color::DarkGray))
                .highlight_symbol("▶ ");
            let mut state = ListState::default();
            state.select(selected.filter(|i| *i < rows.len()));
            f.render_stateful_widget(list, area, &mut state);
        }
        other => {
            let inner = block.inner(area);
            f.render_widget(block, area);
            draw_placeholder(f, inner, other);
        }
    }
}

fn row_item(row: &RowView, width: usize) -> ListItem<'static> {
    let mut first = vec![Span::styled(
        row.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(badge) = &row.badge {
        first.push(Span::raw(" "));
        first.push(Span::styled(
            format!("[{badge}]"),
            Style::default().fg(tone_color(row.tone)),
        ));
    }
    if let Some(trailing) = &row.trailing {
        first.push(Span::styled(
            format!("  {trailing}"),
            Style::default().fg(Color::Gray),
        ));
    }
    let second = Line::from(Span::styled(
        truncate_str(&row.subtext, width.max(8)),
        Style::default().fg(Color::DarkGray),
    ));
    ListItem::new(vec![Line::from(first), second])
}

fn draw_placeholder<T>(f: &mut Frame, area: Rect, panel: &Panel<T>) {
    let Some(text) = panel.placeholder() else {
        return;
    };
    let color = match panel {
        Panel::Failed(_) => Color::LightRed,
        _ => Color::DarkGray,
    };
    let paragraph = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

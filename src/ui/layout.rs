use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::domain::Tab;

#[derive(Debug, Clone, Copy)]
pub struct UiAreas {
    pub size: Rect,
    pub header: Rect,
    pub tab_bar: Rect,
    /// KPI cards on the dashboard, filter bar on scoped tabs
    pub strip: Rect,
    /// Charts row, dashboard only
    pub charts: Option<Rect>,
    pub body: Rect,
    pub status_line: Rect,
    pub command_line: Rect,
}

pub fn areas(size: Rect, tab: Tab) -> UiAreas {
    let dashboard = tab == Tab::Dashboard;
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(if dashboard { 4 } else { 3 }),
            Constraint::Length(if dashboard { 9 } else { 0 }),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(size);

    UiAreas {
        size,
        header: vertical[0],
        tab_bar: vertical[1],
        strip: vertical[2],
        charts: dashboard.then_some(vertical[3]),
        body: vertical[4],
        status_line: vertical[5],
        command_line: vertical[6],
    }
}

/// Grid cells for `count` containers: up to three per row
pub fn container_cells(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let per_row = count.min(3);
    let rows = count.div_ceil(per_row);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    let mut cells = Vec::with_capacity(count);
    for (row, row_area) in row_areas.iter().enumerate() {
        let in_row = (count - row * per_row).min(per_row);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, in_row as u32); in_row])
            .split(*row_area);
        cells.extend(columns.iter().copied());
    }
    cells
}

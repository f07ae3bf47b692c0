use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table as RatatuiTable},
    Frame,
};

use crate::app::App;
use crate::mode::Mode;
use crate::notify::Severity;
use crate::util::{display_width, letters_from_col};

/// Space ratatui leaves between table columns
const COLUMN_SPACING: usize = 1;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.size();

    if let Some(bg) = app.style.background() {
        frame.render_widget(Block::default().style(ratatui::style::Style::default().bg(bg)), area);
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_formula_bar(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
    render_message_line(frame, app, chunks[3]);

    match app.mode {
        Mode::EditCell => {
            let title = format!(" Edit {} ", app.view.cursor().label());
            render_dialog(frame, app, &title);
        }
        Mode::Jump => render_dialog(frame, app, " Go to cell (B3) or row (3) "),
        _ => {}
    }
}

/// How many columns starting at `start` fit in `avail` cells (at least one)
fn fit_columns(widths: &[usize], start: usize, avail: usize) -> usize {
    let mut used = 0;
    let mut count = 0;
    for w in widths.iter().skip(start) {
        used += w + COLUMN_SPACING;
        if used > avail + COLUMN_SPACING && count > 0 {
            break;
        }
        count += 1;
    }
    count.max(1)
}

fn render_formula_bar(frame: &mut Frame, app: &App, area: Rect) {
    let label = format!(" {} ", app.view.cursor().label());
    let focused = app.mode == Mode::FormulaBar;
    let text = if focused {
        app.prompt_buffer().to_string()
    } else {
        app.current_cell_text()
    };

    let line = Line::from(vec![
        Span::styled(label.clone(), app.style.formula_label()),
        Span::raw(" "),
        Span::styled(text, app.style.formula_bar(focused)),
    ]);
    frame.render_widget(Paragraph::new(line).style(app.style.formula_bar(focused)), area);

    if focused {
        let offset = display_width(&label) + 1 + prompt_cursor_width(app);
        frame.set_cursor(area.x + offset as u16, area.y);
    }
}

/// Display width of the prompt text left of its cursor
fn prompt_cursor_width(app: &App) -> usize {
    let before: String = app.prompt_buffer().chars().take(app.prompt_cursor()).collect();
    display_width(&before)
}

fn render_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.model.display_name()))
        .border_style(app.style.row_number());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let max_width = app.config.max_col_width;
    app.view.sync_col_widths(&app.model, max_width);

    let col_count = app.model.column_count();
    if col_count == 0 || inner.height < 3 {
        return;
    }

    // Row number gutter
    let row_num_width = app.model.row_count().to_string().len().max(3);
    let avail = (inner.width as usize).saturating_sub(row_num_width + COLUMN_SPACING);

    // Index row and header row take two lines
    app.view.visible_rows = (inner.height as usize).saturating_sub(2).max(1);

    let view = &mut app.view;
    let widths = &view.col_widths;
    if view.cursor_col < view.viewport_col {
        view.viewport_col = view.cursor_col;
    }
    while view.viewport_col < view.cursor_col
        && fit_columns(widths, view.viewport_col, avail) <= view.cursor_col - view.viewport_col
    {
        view.viewport_col += 1;
    }
    view.visible_cols = fit_columns(widths, view.viewport_col, avail);
    view.scroll_to_cursor();

    let view = &app.view;
    let style = &app.style;
    let first_col = view.viewport_col;
    let last_col = (first_col + view.visible_cols).min(col_count);
    let first_row = view.viewport_row;
    let last_row = (first_row + view.visible_rows).min(app.model.row_count());

    let mut constraints: Vec<Constraint> = Vec::with_capacity(last_col - first_col + 1);
    constraints.push(Constraint::Length(row_num_width as u16));
    for w in &view.col_widths[first_col..last_col] {
        constraints.push(Constraint::Length(*w as u16));
    }

    // Column letters
    let mut index_cells: Vec<Cell> = Vec::with_capacity(constraints.len());
    index_cells.push(Cell::from(""));
    for col in first_col..last_col {
        let cell_style = if col == view.cursor_col {
            style.index_row_cursor()
        } else {
            style.index_row()
        };
        index_cells.push(Cell::from(letters_from_col(col)).style(cell_style));
    }

    // Column names
    let names = app.model.column_names();
    let mut header_cells: Vec<Cell> = Vec::with_capacity(constraints.len());
    header_cells.push(Cell::from(""));
    for name in &names[first_col..last_col] {
        header_cells.push(Cell::from(name.clone()).style(style.header()));
    }

    let mut rows: Vec<Row> = Vec::with_capacity(last_row - first_row + 1);
    rows.push(Row::new(header_cells));

    if let Some(table) = app.model.table() {
        for row_idx in first_row..last_row {
            let mut cells: Vec<Cell> = Vec::with_capacity(constraints.len());

            let row_num_style = if row_idx == view.cursor_row {
                style.row_number_cursor()
            } else {
                style.row_number()
            };
            cells.push(Cell::from(format!("{:>width$}", row_idx + 1, width = row_num_width)).style(row_num_style));

            for col_idx in first_col..last_col {
                let content = table
                    .get_cell(row_idx, col_idx)
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                let cell_style = if row_idx == view.cursor_row && col_idx == view.cursor_col {
                    style.cell_cursor()
                } else {
                    style.cell()
                };
                cells.push(Cell::from(content).style(cell_style));
            }

            rows.push(Row::new(cells));
        }
    }

    let grid = RatatuiTable::new(rows, constraints)
        .header(Row::new(index_cells))
        .column_spacing(COLUMN_SPACING as u16);

    frame.render_widget(grid, inner);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode_text = format!(" {} ", app.mode.display_name());
    let file_text = format!(" {} ", app.model.display_name());
    let modified_text = if app.model.is_modified() { "[MODIFIED]" } else { "" };

    let right = format!(
        "{} {} rows × {} cols  {} ",
        app.key_buffer_display(),
        app.model.row_count(),
        app.model.column_count(),
        app.view.cursor().label()
    );

    let used = display_width(&mode_text)
        + display_width(&file_text)
        + display_width(modified_text)
        + display_width(&right);
    let padding = (area.width as usize).saturating_sub(used);

    let status = Line::from(vec![
        Span::styled(mode_text, app.style.status_mode(&app.mode)),
        Span::raw(file_text),
        Span::styled(modified_text, app.style.status_modified()),
        Span::raw(" ".repeat(padding)),
        Span::raw(right),
    ]);

    frame.render_widget(Paragraph::new(status).style(app.style.status_bar()), area);
}

fn render_message_line(frame: &mut Frame, app: &App, area: Rect) {
    if app.mode == Mode::Command {
        let line = Line::from(vec![
            Span::styled(":", app.style.command_prompt()),
            Span::styled(app.prompt_buffer().to_string(), app.style.command_line()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        frame.set_cursor(area.x + 1 + prompt_cursor_width(app) as u16, area.y);
        return;
    }

    if let Some(note) = app.notifications.latest() {
        let prefix = match note.severity {
            Severity::Info => "",
            Severity::Warning => "Warning: ",
            Severity::Error => "Error: ",
        };
        let text = format!("{}{}", prefix, note.text);
        frame.render_widget(
            Paragraph::new(text).style(app.style.message(note.severity)),
            area,
        );
    }
}

/// Centered area `width` wide and `height` tall, clamped to `area`
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

fn render_dialog(frame: &mut Frame, app: &App, title: &str) {
    let area = frame.size();
    let width = (area.width / 2).max(40);
    let dialog = centered_rect(width, 3, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(app.style.dialog_border())
        .style(app.style.dialog());
    let inner = block.inner(dialog);

    frame.render_widget(Clear, dialog);
    frame.render_widget(
        Paragraph::new(app.prompt_buffer().to_string()).block(block),
        dialog,
    );

    let x = (inner.x + prompt_cursor_width(app) as u16).min(inner.right().saturating_sub(1));
    frame.set_cursor(x, inner.y);
}

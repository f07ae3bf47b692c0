use crate::model::TableModel;
use crate::util::CellRef;

/// View state for the grid (cursor and viewport).
/// Bounds come from the model on every move, so the view never holds stale dimensions.
#[derive(Debug, Clone)]
pub struct TableView {
    // Cursor position
    pub cursor_row: usize,
    pub cursor_col: usize,

    // Viewport offset (top-left visible cell)
    pub viewport_row: usize,
    pub viewport_col: usize,

    // Visible area size (set during render)
    pub visible_rows: usize,
    pub visible_cols: usize,

    // Cached column widths and the model revision they were computed for
    pub col_widths: Vec<usize>,
    widths_revision: Option<u64>,
}

impl TableView {
    pub fn new() -> Self {
        Self {
            cursor_row: 0,
            cursor_col: 0,
            viewport_row: 0,
            viewport_col: 0,
            visible_rows: 20,
            visible_cols: 10,
            col_widths: Vec::new(),
            widths_revision: None,
        }
    }

    /// Recompute cached column widths if the table changed since the last call
    pub fn sync_col_widths(&mut self, model: &TableModel, max_width: usize) {
        if self.widths_revision == Some(model.revision()) {
            return;
        }
        self.col_widths = model
            .table()
            .map(|t| t.col_widths(max_width))
            .unwrap_or_default();
        self.widths_revision = Some(model.revision());
    }

    pub fn cursor(&self) -> CellRef {
        CellRef::new(self.cursor_row, self.cursor_col)
    }

    /// Cursor as the signed indices the model takes
    pub fn cursor_index(&self) -> (isize, isize) {
        (self.cursor_row as isize, self.cursor_col as isize)
    }

    /// Ensure cursor is within table bounds (after deletes or a reload)
    pub fn clamp_cursor(&mut self, model: &TableModel) {
        self.cursor_row = self.cursor_row.min(model.row_count().saturating_sub(1));
        self.cursor_col = self.cursor_col.min(model.column_count().saturating_sub(1));
        self.scroll_to_cursor();
    }

    /// Ensure viewport contains the cursor
    pub fn scroll_to_cursor(&mut self) {
        let visible_rows = self.visible_rows.max(1);
        let visible_cols = self.visible_cols.max(1);

        // Vertical scrolling
        if self.cursor_row < self.viewport_row {
            self.viewport_row = self.cursor_row;
        } else if self.cursor_row >= self.viewport_row + visible_rows {
            self.viewport_row = self.cursor_row + 1 - visible_rows;
        }

        // Horizontal scrolling
        if self.cursor_col < self.viewport_col {
            self.viewport_col = self.cursor_col;
        } else if self.cursor_col >= self.viewport_col + visible_cols {
            self.viewport_col = self.cursor_col + 1 - visible_cols;
        }
    }

    // Navigation methods
    pub fn move_left(&mut self) {
        self.move_left_n(1);
    }

    pub fn move_right(&mut self, model: &TableModel) {
        self.move_right_n(1, model);
    }

    pub fn move_up(&mut self) {
        self.move_up_n(1);
    }

    pub fn move_down(&mut self, model: &TableModel) {
        self.move_down_n(1, model);
    }

    pub fn move_to_top(&mut self) {
        self.cursor_row = 0;
        self.scroll_to_cursor();
    }

    pub fn move_to_bottom(&mut self, model: &TableModel) {
        self.cursor_row = model.row_count().saturating_sub(1);
        self.scroll_to_cursor();
    }

    pub fn move_to_first_col(&mut self) {
        self.cursor_col = 0;
        self.scroll_to_cursor();
    }

    pub fn move_to_last_col(&mut self, model: &TableModel) {
        self.cursor_col = model.column_count().saturating_sub(1);
        self.scroll_to_cursor();
    }

    pub fn page_down(&mut self, model: &TableModel) {
        let jump = self.visible_rows.saturating_sub(1).max(1);
        self.move_down_n(jump, model);
    }

    pub fn page_up(&mut self) {
        let jump = self.visible_rows.saturating_sub(1).max(1);
        self.move_up_n(jump);
    }

    pub fn half_page_down(&mut self, model: &TableModel) {
        let jump = (self.visible_rows / 2).max(1);
        self.move_down_n(jump, model);
    }

    pub fn half_page_up(&mut self) {
        let jump = (self.visible_rows / 2).max(1);
        self.move_up_n(jump);
    }

    // Movement with count
    pub fn move_left_n(&mut self, n: usize) {
        self.cursor_col = self.cursor_col.saturating_sub(n);
        self.scroll_to_cursor();
    }

    pub fn move_right_n(&mut self, n: usize, model: &TableModel) {
        self.cursor_col = self.cursor_col.saturating_add(n).min(model.column_count().saturating_sub(1));
        self.scroll_to_cursor();
    }

    pub fn move_up_n(&mut self, n: usize) {
        self.cursor_row = self.cursor_row.saturating_sub(n);
        self.scroll_to_cursor();
    }

    pub fn move_down_n(&mut self, n: usize, model: &TableModel) {
        self.cursor_row = self.cursor_row.saturating_add(n).min(model.row_count().saturating_sub(1));
        self.scroll_to_cursor();
    }

    /// Move to a cell, clamping to the table
    pub fn goto_cell(&mut self, cell: CellRef, model: &TableModel) {
        self.cursor_row = cell.row;
        self.cursor_col = cell.col;
        self.clamp_cursor(model);
    }

    pub fn goto_row(&mut self, row: usize, model: &TableModel) {
        self.goto_cell(CellRef::new(row, self.cursor_col), model);
    }
}

impl Default for TableView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Model over a 3-column table with `rows` data rows
    fn make_model(rows: usize) -> (TempDir, TableModel) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grid.csv");
        let mut content = String::from("a,b,c\n");
        for i in 0..rows {
            content.push_str(&format!("{},{},{}\n", i, i * 2, i * 3));
        }
        std::fs::write(&path, content).unwrap();
        let model = TableModel::open(&path).unwrap();
        (dir, model)
    }

    #[test]
    fn test_tableview_new() {
        let view = TableView::new();
        assert_eq!(view.cursor(), CellRef::new(0, 0));
        assert_eq!(view.viewport_row, 0);
        assert_eq!(view.viewport_col, 0);
    }

    #[test]
    fn test_tableview_navigation() {
        let (_dir, model) = make_model(3);
        let mut view = TableView::new();

        view.move_right(&model);
        assert_eq!(view.cursor_col, 1);

        view.move_down(&model);
        assert_eq!(view.cursor_row, 1);

        view.move_left();
        assert_eq!(view.cursor_col, 0);

        view.move_up();
        assert_eq!(view.cursor_row, 0);
    }

    #[test]
    fn test_tableview_navigation_bounds() {
        let (_dir, model) = make_model(2);
        let mut view = TableView::new();

        // Can't go negative
        view.move_left();
        view.move_up();
        assert_eq!(view.cursor(), CellRef::new(0, 0));

        // Can't go past bounds
        view.move_right_n(10, &model);
        view.move_down_n(10, &model);
        assert_eq!(view.cursor(), CellRef::new(1, 2));
    }

    #[test]
    fn test_tableview_move_to_edges() {
        let (_dir, model) = make_model(5);
        let mut view = TableView::new();

        view.move_to_bottom(&model);
        view.move_to_last_col(&model);
        assert_eq!(view.cursor(), CellRef::new(4, 2));

        view.move_to_top();
        view.move_to_first_col();
        assert_eq!(view.cursor(), CellRef::new(0, 0));
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let (_dir, model) = make_model(50);
        let mut view = TableView::new();
        view.visible_rows = 10;

        view.move_down_n(15, &model);
        assert_eq!(view.cursor_row, 15);
        assert_eq!(view.viewport_row, 6);

        view.page_up();
        assert_eq!(view.cursor_row, 6);
        assert_eq!(view.viewport_row, 6);

        view.half_page_down(&model);
        assert_eq!(view.cursor_row, 11);
        view.move_to_top();
        assert_eq!(view.viewport_row, 0);
    }

    #[test]
    fn test_goto_clamps() {
        let (_dir, model) = make_model(3);
        let mut view = TableView::new();

        view.goto_cell(CellRef::new(1, 2), &model);
        assert_eq!(view.cursor(), CellRef::new(1, 2));

        view.goto_cell(CellRef::new(99, 99), &model);
        assert_eq!(view.cursor(), CellRef::new(2, 2));

        view.goto_row(0, &model);
        assert_eq!(view.cursor(), CellRef::new(0, 2));
    }

    #[test]
    fn test_col_widths_follow_revisions() {
        let (_dir, mut model) = make_model(3);
        let mut view = TableView::new();

        view.sync_col_widths(&model, 30);
        assert_eq!(view.col_widths, vec![3, 3, 3]);

        model.set_cell(0, 0, "a longer value").unwrap();
        view.sync_col_widths(&model, 30);
        assert_eq!(view.col_widths, vec![14, 3, 3]);

        view.sync_col_widths(&model, 5);
        assert_eq!(view.col_widths, vec![14, 3, 3]);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let (_dir, mut model) = make_model(3);
        let mut view = TableView::new();
        view.move_to_bottom(&model);
        view.move_to_last_col(&model);

        model.delete_row(2).unwrap();
        model.delete_column(2).unwrap();
        view.clamp_cursor(&model);
        assert_eq!(view.cursor(), CellRef::new(1, 1));
    }
}

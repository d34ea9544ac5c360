use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Picker layout configuration
pub struct PickerLayout {
    pub query_area: Rect,
    pub counter_area: Rect,
    pub list_area: Rect,
}

impl PickerLayout {
    /// Create the picker layout:
    /// - Query line: top row, with the match counter right-aligned
    /// - Results list: every remaining row
    pub fn new(area: Rect, counter_width: u16) -> Self {
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Query line
                Constraint::Min(0),    // Results list
            ])
            .split(area);

        let query_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(counter_width)])
            .split(vertical_chunks[0]);

        Self {
            query_area: query_chunks[0],
            counter_area: query_chunks[1],
            list_area: vertical_chunks[1],
        }
    }
}

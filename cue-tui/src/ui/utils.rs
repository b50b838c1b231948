use ratatui::layout::Rect;

/// Fixed-size rectangle centered inside `r`, clamped so it never overflows
/// small terminals.
pub fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

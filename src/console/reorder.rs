//! Drag-and-drop reordering of the keybinding list

/// Vertical extent of a rendered row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBox {
    pub id: i64,
    pub top: f32,
    pub height: f32,
}

impl RowBox {
    pub fn contains(&self, y: f32) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Row the dragged item should be inserted before: among the rows other than
/// the dragged one, the closest whose midpoint lies below the pointer.
/// `None` means append at the end.
pub fn insertion_point(rows: &[RowBox], dragging: i64, y: f32) -> Option<i64> {
    let mut closest: Option<(f32, i64)> = None;
    for row in rows.iter().filter(|row| row.id != dragging) {
        let offset = y - row.top - row.height / 2.0;
        if offset < 0.0 && closest.is_none_or(|(best, _)| offset > best) {
            closest = Some((offset, row.id));
        }
    }
    closest.map(|(_, id)| id)
}

/// Move `dragging` within `order` so it sits before `before` (or last)
pub fn move_before(order: &mut Vec<i64>, dragging: i64, before: Option<i64>) -> bool {
    let Some(from) = order.iter().position(|id| *id == dragging) else {
        return false;
    };
    let original = order.clone();
    order.remove(from);
    match before.and_then(|target| order.iter().position(|id| *id == target)) {
        Some(index) => order.insert(index, dragging),
        None => order.push(dragging),
    }
    *order != original
}

/// In-progress mouse drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub dragging: i64,
}

impl DragState {
    pub fn begin(rows: &[RowBox], y: f32) -> Option<Self> {
        rows.iter()
            .find(|row| row.contains(y))
            .map(|row| Self { dragging: row.id })
    }

    /// Reposition the dragged id in `order` for the pointer at `y`
    pub fn hover(&self, rows: &[RowBox], order: &mut Vec<i64>, y: f32) -> bool {
        let before = insertion_point(rows, self.dragging, y);
        move_before(order, self.dragging, before)
    }
}

/// Move the item at `index` by one position; returns its new index
pub fn shift(order: &mut [i64], index: usize, up: bool) -> Option<usize> {
    if index >= order.len() {
        return None;
    }
    let target = if up {
        index.checked_sub(1)?
    } else {
        let next = index + 1;
        if next >= order.len() {
            return None;
        }
        next
    };
    order.swap(index, target);
    Some(target)
}

//! Two-column category accordion.
//!
//! The list is split in half (the left column takes the extra item when the
//! count is odd) and each column tracks its own expanded item. At most one item
//! per column is open; toggling the open item closes it.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct CategoryAccordion<T> {
    left: Vec<T>,
    right: Vec<T>,
    open_left: Option<usize>,
    open_right: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AccordionItem<T> {
    #[serde(flatten)]
    pub item: T,
    pub open: bool,
}

#[derive(Debug, Serialize)]
pub struct AccordionView<T> {
    pub left: Vec<AccordionItem<T>>,
    pub right: Vec<AccordionItem<T>>,
}

impl<T> CategoryAccordion<T> {
    pub fn new(mut items: Vec<T>) -> Self {
        let midpoint = items.len().div_ceil(2);
        let right = items.split_off(midpoint);
        Self {
            left: items,
            right,
            open_left: None,
            open_right: None,
        }
    }

    pub fn column(&self, column: Column) -> &[T] {
        match column {
            Column::Left => &self.left,
            Column::Right => &self.right,
        }
    }

    pub fn open_index(&self, column: Column) -> Option<usize> {
        match column {
            Column::Left => self.open_left,
            Column::Right => self.open_right,
        }
    }

    /// Opens `index` in `column`, or closes it if it is already open.
    /// Indexes past the end of the column are ignored.
    pub fn toggle(&mut self, column: Column, index: usize) {
        if index >= self.column(column).len() {
            return;
        }
        let open = match column {
            Column::Left => &mut self.open_left,
            Column::Right => &mut self.open_right,
        };
        *open = if *open == Some(index) { None } else { Some(index) };
    }

    pub fn into_view(self) -> AccordionView<T> {
        fn mark<T>(items: Vec<T>, open: Option<usize>) -> Vec<AccordionItem<T>> {
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| AccordionItem {
                    item,
                    open: open == Some(i),
                })
                .collect()
        }

        let open_left = self.open_index(Column::Left);
        let open_right = self.open_index(Column::Right);
        AccordionView {
            left: mark(self.left, open_left),
            right: mark(self.right, open_right),
        }
    }
}

//! Tables.
//!
//! [§ 17 Tables](https://www.w3.org/TR/CSS2/tables.html)
//!
//! A simplified automatic table layout: rows of cells on a grid, no spans,
//! no captions, separated borders only. Column widths come from the minimum
//! and preferred widths of the cells, measured with the same strategies as
//! shrink-to-fit boxes.

use std::mem;

use super::block::resolve_auto_margins;
use super::cursor::LayoutCursor;
use super::node::{LayoutKind, LayoutNodeId};
use super::pass::LayoutPass;
use super::values::{resolve_vertical_auto, LayoutStrategy, UsedHeight, UsedWidth};
use crate::style::{LengthPercentageAuto, VerticalAlign};

/// One 'table-row' and its cells, in column order.
#[derive(Debug, Clone)]
pub(crate) struct TableRow {
    pub height: LengthPercentageAuto,
    pub cells: Vec<LayoutNodeId>,
}

#[derive(Debug, Default)]
pub(crate) struct TableContent {
    pub rows: Vec<TableRow>,
    /// Column widths of the last layout, border boxes of the cells.
    pub columns: Vec<f32>,
}

impl TableContent {
    pub fn cells(&self) -> impl Iterator<Item = LayoutNodeId> + '_ {
        self.rows.iter().flat_map(|row| row.cells.iter().copied())
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).max().unwrap_or(0)
    }
}

/// Column widths plus the spacing between and around them.
///
/// [§ 17.6.1 The separated borders model](https://www.w3.org/TR/CSS2/tables.html#separated-borders)
///
/// "The lengths specify the distance that separates adjoining cell borders."
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TableGrid {
    pub columns: Vec<f32>,
    pub spacing: f32,
}

impl TableGrid {
    /// Width of the grid including the spacing at both edges.
    pub fn width(&self) -> f32 {
        if self.columns.is_empty() {
            return 0.0;
        }
        self.columns.iter().sum::<f32>() + self.spacing * (self.columns.len() + 1) as f32
    }

    /// Widen the columns until the grid is `width` wide, in proportion to
    /// their current widths (evenly when they are all zero).
    pub fn expand_to(&mut self, width: f32) {
        let extra = width - self.width();
        if extra <= 0.0 || self.columns.is_empty() {
            return;
        }
        let total: f32 = self.columns.iter().sum();
        let count = self.columns.len() as f32;
        for column in &mut self.columns {
            *column += if total > 0.0 {
                extra * *column / total
            } else {
                extra / count
            };
        }
    }
}

impl LayoutPass<'_> {
    /// Minimum and preferred width of every column.
    fn column_widths(&mut self, table: &TableContent) -> (Vec<f32>, Vec<f32>) {
        let count = table.column_count();
        let mut minimum = vec![0.0_f32; count];
        let mut preferred = vec![0.0_f32; count];
        for row in &table.rows {
            for (column, cell) in row.cells.iter().copied().enumerate() {
                {
                    let node = self.node_mut(cell);
                    node.containing_width = UsedWidth::expanding();
                    node.containing_height = UsedHeight::content();
                }
                let cell_minimum = self.calc_minimum(cell);
                let cell_preferred = self.calc_preferred(cell);
                let node = self.node(cell);
                let edges = node.padding.horizontal() + node.border.horizontal();
                minimum[column] = minimum[column].max(cell_minimum + edges);
                preferred[column] = preferred[column].max(cell_preferred.max(cell_minimum) + edges);
            }
        }
        (minimum, preferred)
    }

    /// Choose the grid, size the table to it, lay out each cell in its
    /// column and stack the rows.
    pub(crate) fn layout_table(&mut self, id: LayoutNodeId, cursor: &mut LayoutCursor, strategy: LayoutStrategy) {
        let mut table = match &mut self.node_mut(id).kind {
            LayoutKind::Table(table) => mem::take(&mut **table),
            _ => return,
        };
        self.layout_table_content(id, &mut table, cursor, strategy);
        if let LayoutKind::Table(slot) = &mut self.node_mut(id).kind {
            **slot = table;
        }
    }

    fn layout_table_content(
        &mut self,
        id: LayoutNodeId,
        table: &mut TableContent,
        cursor: &mut LayoutCursor,
        strategy: LayoutStrategy,
    ) {
        // STEP 1: Column widths.
        let (minimum, preferred) = self.column_widths(table);
        let node = self.node(id);
        let spacing = node.style.border_spacing;
        let minimum = TableGrid {
            columns: minimum,
            spacing,
        };
        let preferred = TableGrid {
            columns: preferred,
            spacing,
        };

        // STEP 2: The grid.
        // [§ 17.5.2.2 Automatic table layout](https://www.w3.org/TR/CSS2/tables.html#auto-table-layout)
        let grid = if strategy == LayoutStrategy::Minimum {
            minimum
        } else if node.width.expanding {
            preferred
        } else if node.style.width.is_auto() {
            let available = node.width.value;
            if preferred.width() > available {
                let mut grid = minimum;
                grid.expand_to(available);
                grid
            } else {
                preferred
            }
        } else {
            let width = node.width.value;
            let mut grid = if preferred.width() > width {
                minimum
            } else {
                preferred
            };
            grid.expand_to(width);
            grid
        };

        let grid_width = grid.width();
        {
            let node = self.node_mut(id);
            if node.width.expanding {
                node.width.value = node.width.value.max(grid_width);
            } else {
                node.width.value = grid_width;
                if !node.containing_width.expanding && !node.is_floated() && !node.is_inline_block() {
                    resolve_auto_margins(node);
                }
            }
        }
        log::debug!(
            target: "flowbox::table",
            "table {} {strategy}: {} rows, columns {:?}",
            self.node(id).node,
            table.rows.len(),
            grid.columns
        );

        // STEP 3: Cells.
        let (table_width, table_height, relative) = {
            let node = self.node(id);
            (node.width.value, node.height, node.relative)
        };
        let containing_height = if table_height.use_content {
            UsedHeight::content()
        } else {
            table_height
        };
        let mut row_heights = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let mut row_height = resolve_vertical_auto(row.height, containing_height);
            for (column, cell) in row.cells.iter().copied().enumerate() {
                {
                    let node = self.node_mut(cell);
                    node.containing_width = UsedWidth::fixed(table_width);
                    node.containing_height = containing_height;
                }
                self.calculate_top_down_widths(cell, LayoutStrategy::Normal);
                self.calculate_top_down_heights(cell);
                let offset = self.local_relative_offset(cell);
                {
                    let node = self.node_mut(cell);
                    let edges = node.padding.horizontal() + node.border.horizontal();
                    node.width = UsedWidth::fixed((grid.columns[column] - edges).max(0.0));
                    node.relative.x = relative.x + offset.x;
                    node.relative.y = relative.y + offset.y;
                }
                self.layout_formatting_root(cell, LayoutStrategy::Normal);
                let node = self.node(cell);
                row_height = row_height
                    .max(node.height.value + node.padding.vertical() + node.border.vertical());
            }
            row_heights.push(row_height);
        }

        // STEP 4: Stack the rows.
        cursor.apply_margin();
        let mut y = cursor.y;
        for (row, row_height) in table.rows.iter().zip(row_heights) {
            y += spacing;
            let mut x = cursor.x + spacing;
            for (column, cell) in row.cells.iter().copied().enumerate() {
                let node = self.node(cell);
                let border_height = node.height.value + node.padding.vertical() + node.border.vertical();
                // [§ 17.5.3 Table height algorithms](https://www.w3.org/TR/CSS2/tables.html#height-layout)
                //
                // "middle: The center of the cell is aligned with the center
                // of the rows it spans."
                let shift = match node.style.vertical_align {
                    VerticalAlign::Middle => (row_height - border_height) / 2.0,
                    VerticalAlign::Bottom => row_height - border_height,
                    _ => 0.0,
                };
                let content_x = x + node.border.left + node.padding.left;
                let content_y = y + node.border.top + node.padding.top + shift;
                self.set_root_content_position(cell, content_x, content_y);
                x += grid.columns[column] + spacing;
            }
            y += row_height;
        }
        if !table.rows.is_empty() {
            y += spacing;
        }
        cursor.y = y;
        table.columns = grid.columns;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_width_includes_edge_spacing() {
        let grid = TableGrid {
            columns: vec![50.0, 100.0],
            spacing: 2.0,
        };
        assert!((grid.width() - 156.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_expand_is_proportional() {
        let mut grid = TableGrid {
            columns: vec![50.0, 150.0],
            spacing: 0.0,
        };
        grid.expand_to(400.0);
        assert_eq!(grid.columns, vec![100.0, 300.0]);
    }

    #[test]
    fn test_expand_zero_columns_evenly() {
        let mut grid = TableGrid {
            columns: vec![0.0, 0.0],
            spacing: 10.0,
        };
        grid.expand_to(130.0);
        assert_eq!(grid.columns, vec![50.0, 50.0]);
    }
}

//! Matrices and aligned environments
//!
//! Cells are laid out in the surrounding style, aligned inside their
//! column and stacked row by row with TeX's baselineskip rule. The
//! finished table is centered on the math axis.

use super::ListLayout;
use crate::display::{Child, MathBox};
use crate::model::{ColumnAlignment, MathTable};
use crate::style::LayoutStyle;

impl ListLayout<'_, '_> {
    pub(super) fn make_table(&self, table: &MathTable) -> MathBox {
        let rows = table.num_rows();
        let columns = table.num_columns();
        if rows == 0 || columns == 0 {
            return MathBox::empty();
        }
        let cell_style = LayoutStyle::new(self.style.style, false);
        let cells: Vec<Vec<MathBox>> = table
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| self.ts.layout_list(cell, cell_style, false))
                    .collect()
            })
            .collect();

        let mut column_widths = vec![0.0f32; columns];
        for row in &cells {
            for (column, cell) in row.iter().enumerate() {
                column_widths[column] = column_widths[column].max(cell.width());
            }
        }
        let column_spacing = table.column_spacing * self.metrics.mu();
        let row_boxes: Vec<MathBox> = cells
            .into_iter()
            .map(|row| self.make_row(table, row, &column_widths, column_spacing))
            .collect();
        self.stack_rows(table, row_boxes)
    }

    fn make_row(&self, table: &MathTable, row: Vec<MathBox>, widths: &[f32], spacing: f32) -> MathBox {
        let mut children = Vec::with_capacity(row.len());
        let mut column_x = 0.0;
        for (column, (cell, &width)) in row.into_iter().zip(widths).enumerate() {
            let x = match table.alignment(column) {
                ColumnAlignment::Left => column_x,
                ColumnAlignment::Center => column_x + (width - cell.width()) / 2.0,
                ColumnAlignment::Right => column_x + width - cell.width(),
            };
            children.push(Child::at(x, 0.0, cell));
            column_x += width + spacing;
        }
        let advance = widths.iter().sum::<f32>() + spacing * widths.len().saturating_sub(1) as f32;
        MathBox::container(children, advance)
    }

    fn stack_rows(&self, table: &MathTable, rows: Vec<MathBox>) -> MathBox {
        let config = self.ts.config();
        let size = self.metrics.font_size();
        let openup = table.row_spacing * config.jot_multiplier * size;
        let baseline_skip = openup + config.baseline_skip_multiplier * size;
        let line_skip = openup + config.line_skip_multiplier * size;
        let line_skip_limit = openup + config.line_skip_limit_multiplier * size;

        let mut ascent = 0.0;
        let mut y = 0.0;
        let mut previous_descent: Option<f32> = None;
        let mut positions = Vec::with_capacity(rows.len());
        for row in &rows {
            match previous_descent {
                None => ascent = row.ascent(),
                Some(previous) => {
                    let mut skip = baseline_skip;
                    if skip - (previous + row.ascent()) < line_skip_limit {
                        skip = previous + row.ascent() + line_skip;
                    }
                    y -= skip;
                }
            }
            positions.push(y);
            previous_descent = Some(row.descent());
        }
        let descent = -y + previous_descent.unwrap_or(0.0);
        let shift_down = 0.5 * (ascent - descent) - self.metrics.axis_height();

        let width = rows.iter().map(MathBox::width).fold(0.0, f32::max);
        let children = rows
            .into_iter()
            .zip(positions)
            .map(|(row, y)| Child::at(0.0, y - shift_down, row))
            .collect();
        MathBox::container(children, width)
    }
}

#[cfg(test)]
mod tests {
    use crate::display::MathBox;
    use crate::model::{Atom, LineStyle, MathList, MathTable};
    use crate::parser::parse;
    use crate::typesetter::Typesetter;
    use math_font::{FontMathMetrics, SyntheticFont};

    fn typeset_list(list: &MathList) -> MathBox {
        let font = SyntheticFont::default();
        let metrics = FontMathMetrics::new(&font, 10.0).unwrap();
        Typesetter::new(metrics).typeset(list, LineStyle::Text)
    }

    fn table(markup: &str) -> MathBox {
        typeset_list(&parse(markup).unwrap()).children()[0].node.clone()
    }

    #[test]
    fn test_rows_stack_downward() {
        let node = table("\\begin{matrix} 1 & 2 \\\\ 3 & 4 \\end{matrix}");
        let rows = node.children();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].origin.y < rows[0].origin.y);
        let baseline_skip = 1.2 * 10.0;
        assert!(rows[0].origin.y - rows[1].origin.y >= baseline_skip - 1e-3);
    }

    #[test]
    fn test_table_is_centered_on_axis() {
        let font = SyntheticFont::default();
        let metrics = FontMathMetrics::new(&font, 10.0).unwrap();
        let node = table("\\begin{matrix} 1 & 2 \\\\ 3 & 4 \\end{matrix}");
        let center = (node.ascent() - node.descent()) / 2.0;
        assert!((center - metrics.axis_height()).abs() < 1e-3);
    }

    #[test]
    fn test_cells_center_in_column() {
        let node = table("\\begin{matrix} 1 & 2 \\\\ 333 & 4 \\end{matrix}");
        let rows = node.children();
        let narrow = &rows[0].node.children()[0];
        let wide = &rows[1].node.children()[0];
        let expected = (wide.node.width() - narrow.node.width()) / 2.0;
        assert!((narrow.origin.x - expected).abs() < 1e-4);
        assert_eq!(wide.origin.x, 0.0);
    }

    #[test]
    fn test_columns_do_not_overlap() {
        let node = table("\\begin{matrix} 333 & 4 \\end{matrix}");
        let cells = node.children()[0].node.children();
        assert!(cells[1].origin.x >= cells[0].right());
    }

    #[test]
    fn test_empty_table_is_empty() {
        let list = MathList::from_atoms(vec![Atom::table(MathTable::new(None))]);
        let node = typeset_list(&list);
        assert_eq!(node.width(), 0.0);
    }
}

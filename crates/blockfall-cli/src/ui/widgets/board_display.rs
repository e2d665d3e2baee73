use blockfall_engine::{CellPos, Grid, PieceCells, ShapeKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::BlockDisplay;

/// The grid with its locked cells and the falling piece drawn on top.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    grid: &'a Grid,
    falling_piece: Option<(ShapeKind, PieceCells)>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            falling_piece: None,
            block: None,
        }
    }

    pub fn falling_piece(self, kind: ShapeKind, cells: PieceCells) -> Self {
        Self {
            falling_piece: Some((kind, cells)),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        super::cells_to_u16(self.grid.width(), BlockDisplay::width())
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::cells_to_u16(self.grid.height(), BlockDisplay::height())
            + super::block_vertical_margin(self.block.as_ref())
    }

    fn cell(&self, row: usize, col: usize) -> Option<ShapeKind> {
        if let Some((kind, cells)) = &self.falling_piece
            && cells.contains(&CellPos::new(row, col))
        {
            return Some(*kind);
        }
        self.grid.cell(row, col)
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let vertical = Layout::vertical(
            (0..self.grid.height()).map(|_| Constraint::Length(BlockDisplay::height())),
        );
        let horizontal = Layout::horizontal(
            (0..self.grid.width()).map(|_| Constraint::Length(BlockDisplay::width())),
        )
        .flex(Flex::Center);

        for (row, row_area) in vertical.split(area).iter().enumerate() {
            for (col, cell_area) in horizontal.split(*row_area).iter().enumerate() {
                BlockDisplay::from_cell(self.cell(row, col)).render(*cell_area, buf);
            }
        }
    }
}

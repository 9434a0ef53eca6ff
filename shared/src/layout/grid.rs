//! Menu grid placement rules
//!
//! A cell holds either exactly one FULL item, or up to two HALF items.
//! Occupancy is always computed from the current item list; nothing here
//! keeps its own copy of the grid state.

use std::collections::BTreeMap;

use super::PlacementError;
use crate::models::{GridCell, MenuItem, Place, SizeType};

/// Anything that occupies a grid cell
pub trait GridItem {
    fn item_id(&self) -> i64;
    fn cell(&self) -> GridCell;
    fn size(&self) -> SizeType;
}

impl GridItem for MenuItem {
    fn item_id(&self) -> i64 {
        self.menu_id
    }

    fn cell(&self) -> GridCell {
        MenuItem::cell(self)
    }

    fn size(&self) -> SizeType {
        self.size_type
    }
}

/// A place without a size tag takes the whole cell
impl GridItem for Place {
    fn item_id(&self) -> i64 {
        self.place_id
    }

    fn cell(&self) -> GridCell {
        Place::cell(self)
    }

    fn size(&self) -> SizeType {
        self.size_type.unwrap_or(SizeType::Full)
    }
}

/// Occupancy state of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOccupancy {
    Empty,
    OneHalf,
    TwoHalf,
    Full,
}

impl CellOccupancy {
    /// Whether an item of `size` may be added to a cell in this state
    pub fn admit(self, cell: GridCell, size: SizeType) -> Result<(), PlacementError> {
        match (self, size) {
            (Self::Full, _) => Err(PlacementError::CellHasFull { cell }),
            (Self::TwoHalf, _) => Err(PlacementError::CellFull { cell }),
            (Self::OneHalf, SizeType::Full) => Err(PlacementError::FullOnHalf { cell }),
            (Self::OneHalf, SizeType::Half) | (Self::Empty, _) => Ok(()),
        }
    }
}

/// Compute the occupancy of `cell`.
///
/// `exclude` is the id of the item being moved; it is not counted, so
/// moving an item onto its own cell is never rejected as "cell full".
pub fn occupancy<T: GridItem>(items: &[T], cell: GridCell, exclude: Option<i64>) -> CellOccupancy {
    let mut halves = 0usize;
    for item in items
        .iter()
        .filter(|i| i.cell() == cell && Some(i.item_id()) != exclude)
    {
        match item.size() {
            SizeType::Full => return CellOccupancy::Full,
            SizeType::Half => halves += 1,
        }
    }

    match halves {
        0 => CellOccupancy::Empty,
        1 => CellOccupancy::OneHalf,
        _ => CellOccupancy::TwoHalf,
    }
}

/// Check whether an item of `size` may be placed in `cell`.
pub fn check_placement<T: GridItem>(
    items: &[T],
    cell: GridCell,
    size: SizeType,
    exclude: Option<i64>,
) -> Result<(), PlacementError> {
    occupancy(items, cell, exclude).admit(cell, size)
}

/// What a rendered cell shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellContents<'a> {
    Full(&'a MenuItem),
    Half(&'a MenuItem, Option<&'a MenuItem>),
}

impl CellContents<'_> {
    pub fn occupancy(&self) -> CellOccupancy {
        match self {
            Self::Full(_) => CellOccupancy::Full,
            Self::Half(_, None) => CellOccupancy::OneHalf,
            Self::Half(_, Some(_)) => CellOccupancy::TwoHalf,
        }
    }
}

/// Render model of one category's menu grid
#[derive(Debug, Default)]
pub struct MenuGrid<'a> {
    cells: BTreeMap<GridCell, CellContents<'a>>,
}

impl<'a> MenuGrid<'a> {
    /// Lay out `items` in list order.
    ///
    /// Items that would break the cell rules (server data placed by some
    /// other client) are left out of the render and logged.
    pub fn build(items: &'a [MenuItem]) -> Self {
        let mut cells: BTreeMap<GridCell, CellContents<'a>> = BTreeMap::new();

        for item in items {
            let cell = item.cell();
            let placed = match (cells.get(&cell).copied(), item.size_type) {
                (None, SizeType::Full) => Some(CellContents::Full(item)),
                (None, SizeType::Half) => Some(CellContents::Half(item, None)),
                (Some(CellContents::Half(first, None)), SizeType::Half) => {
                    Some(CellContents::Half(first, Some(item)))
                }
                _ => None,
            };

            match placed {
                Some(contents) => {
                    cells.insert(cell, contents);
                }
                None => tracing::warn!(
                    menu_id = item.menu_id,
                    %cell,
                    "Menu item conflicts with cell occupants, not rendered"
                ),
            }
        }

        Self { cells }
    }

    pub fn get(&self, cell: GridCell) -> Option<&CellContents<'a>> {
        self.cells.get(&cell)
    }

    pub fn occupancy(&self, cell: GridCell) -> CellOccupancy {
        self.cells
            .get(&cell)
            .map_or(CellOccupancy::Empty, CellContents::occupancy)
    }

    /// Occupied cells in (x, y) order
    pub fn iter(&self) -> impl Iterator<Item = (&GridCell, &CellContents<'a>)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

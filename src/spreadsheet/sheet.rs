use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::table::SheetTable;
use crate::spreadsheet::value::Value;
use std::collections::HashMap;

/// Raw cells of one worksheet, in document order, with the bounds they span.
pub(crate) struct Sheet {
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells, row-major
    pub(crate) cells: Vec<Cell>,
    /// Whether to drop rows without any cell
    skip_empty_rows: bool,
    /// Actual data range (determined from cell data)
    pub(crate) row_lower_bound: Option<usize>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(crate) fn new(name: &str, skip_empty_rows: bool) -> Self {
        Self {
            name: name.to_owned(),
            cells: Vec::new(),
            skip_empty_rows,
            row_lower_bound: None,
            row_upper_bound: None,
            col_upper_bound: None,
        }
    }

    /// Adds a cell; cells must arrive in row-major order as in the worksheet part.
    pub(crate) fn push(&mut self, cell: Cell) {
        self.update_bound(cell.row, cell.col);
        self.cells.push(cell);
    }

    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_lower_bound.is_none() { // First cell
            self.row_lower_bound = Some(row);
        }
        if self.col_upper_bound.map(|col_upper_bound| col_upper_bound < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
        self.row_upper_bound = Some(row);
    }

    /// Lays the cells out as a dense grid.
    ///
    /// Rows start at the first used row, columns always start at column A so that
    /// positions match the worksheet's own column letters.
    pub(crate) fn grid(&self) -> Vec<Vec<Option<&Cell>>> {
        let (row_lower, row_upper, col_upper) = match (self.row_lower_bound, self.row_upper_bound, self.col_upper_bound) {
            (Some(row_lower), Some(row_upper), Some(col_upper)) => (row_lower, row_upper, col_upper),
            _ => return Vec::new(),
        };
        let mut index = 0usize;
        let mut table = Vec::<Vec<Option<&Cell>>>::new();
        for row in row_lower..=row_upper {
            let mut record = vec![None; col_upper + 1];
            let mut used = false;
            while index < self.cells.len() && self.cells[index].row == row {
                let cell = &self.cells[index];
                record[cell.col] = Some(cell);
                used = true;
                index += 1;
            }
            if used || !self.skip_empty_rows {
                table.push(record);
            }
        }
        table
    }

    /// Converts the sheet into a header plus resolved records.
    /// The first row of the grid is the header row.
    pub(crate) fn to_table(&self, shared_strings: &[String], mappings: &HashMap<usize, usize>) -> SheetTable {
        let mut rows = self.grid().into_iter().map(|record| {
            record
                .into_iter()
                .map(|cell| cell.map(|cell| cell.resolve(shared_strings, mappings)).unwrap_or(Value::Missing))
                .collect::<Vec<Value>>()
        });
        let header = rows.next().unwrap_or_default();
        SheetTable::new(&self.name, &header, rows.collect())
    }
}

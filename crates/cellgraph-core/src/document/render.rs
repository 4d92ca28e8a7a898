//! Human-readable dump of a whole sheet. Not a stable machine format.

use std::fmt;

use super::Spreadsheet;

impl fmt::Display for Spreadsheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>6} | {:>6} | {}", "ID", "Value", "Contents")?;
        writeln!(f, "-------+--------+---------------")?;
        for id in self.ids() {
            if let Some(cell) = self.cells.get(id) {
                writeln!(
                    f,
                    "{:>6} | {:>6} | '{}'",
                    id,
                    cell.display_string(),
                    cell.contents()
                )?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Cell Dependencies")?;
        write!(f, "{}", self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_sheet() {
        let sheet = Spreadsheet::new();
        let expected = "    ID |  Value | Contents
-------+--------+---------------

Cell Dependencies
Upstream Links:
Downstream Links:
";
        assert_eq!(sheet.to_string(), expected);
    }

    #[test]
    fn test_dump_sorted_by_column_then_row() {
        let mut sheet = Spreadsheet::new();
        sheet.set_cell("B1", "=A1+A2").unwrap();
        sheet.set_cell("A2", "label").unwrap();
        sheet.set_cell("A10", "2").unwrap();
        sheet.set_cell("A1", "=5").unwrap();

        let expected = "    ID |  Value | Contents
-------+--------+---------------
    A1 |    5.0 | '=5'
    A2 |  label | 'label'
   A10 |    2.0 | '2'
    B1 |  ERROR | '=A1+A2'

Cell Dependencies
Upstream Links:
  B1 : [A1, A2]
Downstream Links:
  A1 : [B1]
  A2 : [B1]
";
        assert_eq!(sheet.to_string(), expected);
    }
}

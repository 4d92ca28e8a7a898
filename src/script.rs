//! Line-oriented command scripts.
//!
//! ```text
//! # comment
//! set A1 5
//! set B1 =A1 * 2
//! show B1
//! contents B1
//! delete A1
//! dump
//! ```

use cellgraph_core::Spreadsheet;
use std::io::{self, BufRead, Write};
use tracing::debug;

use crate::error::{CommandError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `set <ID> <TEXT...>`; empty text clears the cell.
    Set { id: String, text: String },
    Delete { id: String },
    Show { id: String },
    Contents { id: String },
    Dump,
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let parse_err = |message: String| CommandError::Parse {
        line: line_no,
        message,
    };

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map(|(w, r)| (w, r.trim_start()))
        .unwrap_or((line, ""));

    let single_id = |name: &str| -> Result<String> {
        match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
            [id] => Ok(id.to_string()),
            [] => Err(parse_err(format!("{} requires a cell id", name))),
            _ => Err(parse_err(format!("{} takes exactly one cell id", name))),
        }
    };

    let command = match word {
        "set" => {
            if rest.is_empty() {
                return Err(parse_err("set requires a cell id".to_string()));
            }
            let (id, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Command::Set {
                id: id.to_string(),
                text: text.trim().to_string(),
            }
        }
        "delete" => Command::Delete {
            id: single_id("delete")?,
        },
        "show" => Command::Show {
            id: single_id("show")?,
        },
        "contents" => Command::Contents {
            id: single_id("contents")?,
        },
        "dump" if rest.is_empty() => Command::Dump,
        "dump" => return Err(parse_err("dump takes no arguments".to_string())),
        other => return Err(parse_err(format!("Unknown command: {}", other))),
    };
    Ok(Some(command))
}

/// Runs commands against one sheet, printing results to `out` and failures
/// to `err`. A failed command is reported and counted; later commands still run.
pub struct Runner<O: Write, E: Write> {
    sheet: Spreadsheet,
    out: O,
    err: E,
    failures: usize,
}

impl<O: Write, E: Write> Runner<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Runner {
            sheet: Spreadsheet::new(),
            out,
            err,
            failures: 0,
        }
    }

    /// Number of commands that failed so far.
    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn execute(&mut self, command: &Command) -> Result<()> {
        debug!(?command, "executing");
        match command {
            Command::Set { id, text } => self.sheet.set_cell(id, text)?,
            Command::Delete { id } => self.sheet.delete_cell(id)?,
            Command::Show { id } => {
                let shown = self.sheet.display_string(id)?;
                writeln!(self.out, "{}", shown)?;
            }
            Command::Contents { id } => {
                let contents = self.sheet.contents(id)?;
                writeln!(self.out, "{}", contents)?;
            }
            Command::Dump => write!(self.out, "{}", self.sheet)?,
        }
        Ok(())
    }

    /// Parse and execute one line. Only I/O failures on the output streams
    /// are returned; everything else is reported on `err`.
    pub fn run_line(&mut self, line: &str, line_no: usize) -> io::Result<()> {
        let result = parse_line(line, line_no).and_then(|command| match command {
            Some(command) => self.execute(&command),
            None => Ok(()),
        });
        match result {
            Ok(()) => Ok(()),
            Err(CommandError::Io(e)) => Err(e),
            Err(e) => {
                self.failures += 1;
                writeln!(self.err, "error: {}", e)
            }
        }
    }

    pub fn run_script<R: BufRead>(&mut self, reader: R) -> io::Result<()> {
        for (idx, line) in reader.lines().enumerate() {
            self.run_line(&line?, idx + 1)?;
        }
        Ok(())
    }

    pub fn dump(&mut self) -> io::Result<()> {
        write!(self.out, "{}", self.sheet)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(script: &str) -> (String, String, usize) {
        let mut runner = Runner::new(Vec::new(), Vec::new());
        runner.run_script(script.as_bytes()).unwrap();
        let failures = runner.failures();
        let Runner { out, err, .. } = runner;
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
            failures,
        )
    }

    fn set(id: &str, text: &str) -> Command {
        Command::Set {
            id: id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_parse_set_keeps_rest_of_line() {
        assert_eq!(
            parse_line("set B1 =A1 * 2", 1).unwrap(),
            Some(set("B1", "=A1 * 2"))
        );
        assert_eq!(
            parse_line("  set   A1    hello  world ", 1).unwrap(),
            Some(set("A1", "hello  world"))
        );
        assert_eq!(parse_line("set A1", 1).unwrap(), Some(set("A1", "")));
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert_eq!(parse_line("", 1).unwrap(), None);
        assert_eq!(parse_line("   ", 1).unwrap(), None);
        assert_eq!(parse_line("# set A1 5", 1).unwrap(), None);
    }

    #[test]
    fn test_parse_single_id_commands() {
        assert_eq!(
            parse_line("show A1", 1).unwrap(),
            Some(Command::Show {
                id: "A1".to_string()
            })
        );
        assert_eq!(parse_line("dump", 1).unwrap(), Some(Command::Dump));
        assert!(parse_line("delete", 1).is_err());
        assert!(parse_line("contents A1 B1", 1).is_err());
        assert!(parse_line("dump A1", 1).is_err());
    }

    #[test]
    fn test_parse_unknown_command_reports_line() {
        let err = parse_line("frobnicate A1", 7).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse error at line 7: Unknown command: frobnicate"
        );
    }

    #[test]
    fn test_run_chain() {
        let (out, err, failures) = run("\
set A1 =5
set B1 =A1+1
set C1 =B1+1
show C1
set A1 =10
show B1
show C1
contents C1
");
        assert_eq!(out, "7.0\n11.0\n12.0\n=B1+1\n");
        assert_eq!(err, "");
        assert_eq!(failures, 0);
    }

    #[test]
    fn test_failures_are_reported_and_execution_continues() {
        let (out, err, failures) = run("\
set A1 1
set B1 =A1+1
set A1 =B1
set a1 2
set C1 =1 +
show A1
");
        assert_eq!(out, "1.0\n");
        assert_eq!(failures, 3);
        let lines: Vec<&str> = err.lines().collect();
        assert_eq!(lines[0], "error: Circular dependency detected: A1 -> B1 -> A1");
        assert_eq!(lines[1], "error: Malformed cell identifier: 'a1'");
        assert!(lines[2].starts_with("error: Invalid contents for C1: "));
    }

    #[test]
    fn test_deep_formula_fails_without_stopping_the_script() {
        let script = format!("set B1 ={}2\nset B1 =3\nshow B1\n", "-".repeat(100_000));
        let (out, err, failures) = run(&script);
        assert_eq!(out, "3.0\n");
        assert_eq!(failures, 1);
        assert!(err.starts_with("error: Invalid contents for B1: Formula parse error: Formula nests deeper than"));
    }

    #[test]
    fn test_unset_cells_show_empty() {
        let (out, _, failures) = run("show Z9\ncontents Z9\ndelete Z9\n");
        assert_eq!(out, "\n\n");
        assert_eq!(failures, 0);
    }

    #[test]
    fn test_set_with_empty_text_deletes() {
        let mut runner = Runner::new(Vec::new(), Vec::new());
        runner.run_script("set A1 4\nset A1\n".as_bytes()).unwrap();
        assert!(runner.sheet.is_empty());
    }

    #[test]
    fn test_dump_command() {
        let (out, _, _) = run("set A1 2\nset B1 =A1*A1\ndump\n");
        let expected = "    ID |  Value | Contents
-------+--------+---------------
    A1 |    2.0 | '2'
    B1 |    4.0 | '=A1*A1'

Cell Dependencies
Upstream Links:
  B1 : [A1]
Downstream Links:
  A1 : [B1]
";
        assert_eq!(out, expected);
    }
}

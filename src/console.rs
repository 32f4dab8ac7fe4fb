//! Menu-driven operator console over a [`SlotTable`].
//!
//! Input is read as whitespace-separated tokens, so a whole session can be
//! piped in (`printf '1 12AB34 hello 2 12AB34 0' | keyslot`). Every command
//! reports its outcome and returns to the menu; only failures of the console
//! streams themselves end [`Console::run`] with an error.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Error, Result};
use crate::export::export_occupancy;
use crate::generate::generate;
use crate::table::{Insertion, SlotTable};

const RULE: &str = "----------------------------------------------";

/// Menu entries, selected by decimal code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Insert,
    Search,
    Remove,
    Display,
    Export,
    Clear,
    Generate,
    Exit,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::Insert,
        Command::Search,
        Command::Remove,
        Command::Display,
        Command::Export,
        Command::Clear,
        Command::Generate,
        Command::Exit,
    ];

    /// Parses a menu code. Anything but `0`..=`7` is `None`.
    pub fn from_code(token: &str) -> Option<Self> {
        match token.trim().parse::<u8>().ok()? {
            1 => Some(Command::Insert),
            2 => Some(Command::Search),
            3 => Some(Command::Remove),
            4 => Some(Command::Display),
            5 => Some(Command::Export),
            6 => Some(Command::Clear),
            7 => Some(Command::Generate),
            0 => Some(Command::Exit),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Command::Insert => 1,
            Command::Search => 2,
            Command::Remove => 3,
            Command::Display => 4,
            Command::Export => 5,
            Command::Clear => 6,
            Command::Generate => 7,
            Command::Exit => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Command::Insert => "Insert an element",
            Command::Search => "Search for an element",
            Command::Remove => "Remove an element",
            Command::Display => "Display the table",
            Command::Export => "Export occupancy to a file",
            Command::Clear => "Clear the table",
            Command::Generate => "Generate random data",
            Command::Exit => "Exit",
        }
    }
}

/// Whitespace-separated token reader over a line-oriented source.
struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    /// Next token, or `None` at end of input.
    ///
    /// Bytes that are not UTF-8 decode to U+FFFD, so they surface as a token
    /// that no command or key accepts.
    fn next_token(&mut self) -> Result<Option<String>> {
        let mut line = Vec::new();
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            line.clear();
            if self.reader.read_until(b'\n', &mut line)? == 0 {
                return Ok(None);
            }
            let text = String::from_utf8_lossy(&line);
            self.pending.extend(text.split_whitespace().map(str::to_owned));
        }
    }
}

/// Interactive session owning a table.
pub struct Console<R, W> {
    input: Tokens<R>,
    out: W,
    table: SlotTable,
    rng: StdRng,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// A session over a fresh default table.
    pub fn new(input: R, out: W) -> Self {
        Self::with_table(SlotTable::new(), input, out)
    }

    pub fn with_table(table: SlotTable, input: R, out: W) -> Self {
        Self {
            input: Tokens::new(input),
            out,
            table,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replaces the random source used by the generate command.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn into_parts(self) -> (SlotTable, W) {
        (self.table, self.out)
    }

    /// Runs the menu loop until `0` is selected or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let Some(token) = self.prompt("Select an action: ")? else {
                writeln!(self.out)?;
                break;
            };
            match Command::from_code(&token) {
                Some(Command::Exit) => break,
                Some(command) => {
                    debug!("console command {:?}", command);
                    self.execute(command)?;
                }
                None => writeln!(self.out, "Invalid choice {token:?}. Please try again.")?,
            }
        }
        writeln!(self.out, "Exiting.")?;
        self.out.flush()?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.out, "\nMenu:")?;
        for command in Command::ALL {
            writeln!(self.out, "{}. {}", command.code(), command.label())?;
        }
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.out, "{text}")?;
        self.out.flush()?;
        self.input.next_token()
    }

    /// Runs one command. Returns early, without output, when input ends
    /// mid-prompt; the menu loop then sees end of input and exits.
    fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Insert => {
                let Some(key) = self.prompt("Enter key (format DDLLDD): ")? else {
                    return Ok(());
                };
                let Some(value) = self.prompt("Enter value: ")? else {
                    return Ok(());
                };
                match self.table.insert(&key, value) {
                    Ok(Insertion::Placed(index)) => {
                        writeln!(self.out, "Element added to slot {index}.")?
                    }
                    Ok(Insertion::Shared(index)) => writeln!(
                        self.out,
                        "Element added to slot {index}, sharing its existing value."
                    )?,
                    Ok(duplicate @ Insertion::Duplicate(_)) => writeln!(
                        self.out,
                        "Key {key} is already present in slot {}.",
                        duplicate.index()
                    )?,
                    Err(e) => writeln!(self.out, "Error: {e}")?,
                }
            }
            Command::Search => {
                let Some(key) = self.prompt("Enter key to search (format DDLLDD): ")? else {
                    return Ok(());
                };
                match self.table.search(&key) {
                    Ok(Some(value)) => writeln!(self.out, "Found value: {value}")?,
                    Ok(None) => writeln!(self.out, "Element not found.")?,
                    Err(e) => writeln!(self.out, "Error: {e}")?,
                }
            }
            Command::Remove => {
                let Some(key) = self.prompt("Enter key to remove (format DDLLDD): ")? else {
                    return Ok(());
                };
                match self.table.remove(&key) {
                    Ok(_) => writeln!(self.out, "Element removed.")?,
                    Err(Error::NotFound(_)) => writeln!(self.out, "Element not found.")?,
                    Err(e) => writeln!(self.out, "Error: {e}")?,
                }
            }
            Command::Display => self.display()?,
            Command::Export => {
                let Some(path) = self.prompt("Enter file name for export: ")? else {
                    return Ok(());
                };
                match export_occupancy(&self.table, &path) {
                    Ok(records) => writeln!(
                        self.out,
                        "Exported {records} records to file: {path}"
                    )?,
                    Err(e) => writeln!(self.out, "Export to {path} failed: {e}")?,
                }
            }
            Command::Clear => {
                self.table.clear();
                writeln!(self.out, "Table cleared.")?;
            }
            Command::Generate => {
                let Some(token) = self.prompt("Enter number of random elements: ")? else {
                    return Ok(());
                };
                match token.parse::<usize>() {
                    Ok(count) => {
                        let report = generate(&mut self.table, count, &mut self.rng);
                        writeln!(
                            self.out,
                            "Generated {count} elements: {} inserted, {} duplicates, {} rejected.",
                            report.inserted, report.duplicates, report.rejected
                        )?;
                    }
                    Err(_) => writeln!(
                        self.out,
                        "Invalid count {token:?}: expected a non-negative integer."
                    )?,
                }
            }
            Command::Exit => {}
        }
        Ok(())
    }

    fn display(&mut self) -> Result<()> {
        writeln!(self.out, "\n{RULE}")?;
        writeln!(self.out, "| {:>6} | {:>20} | {:>8} |", "Index", "Keys", "Value")?;
        writeln!(self.out, "{RULE}")?;
        for view in self.table.live_slots() {
            let keys = view
                .keys
                .iter()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(",");
            writeln!(self.out, "| {:>6} | {:>20} | {:>8} |", view.index, keys, view.value)?;
        }
        writeln!(self.out, "{RULE}")?;
        writeln!(
            self.out,
            "{} keys in {} live slots, {} tombstones, {} slots total.",
            self.table.len(),
            self.table.live_slot_count(),
            self.table.tombstone_count(),
            self.table.capacity()
        )?;
        Ok(())
    }
}

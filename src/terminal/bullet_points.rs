#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

const INDENT_SIZE: usize = 2;

/// Prints nested bullet point lists, one item per line.
pub struct BulletPointPrinter<W: LineWriter + Clone = StdoutLineWriter> {
    writer: W,
    nesting: usize,
}

impl<W: LineWriter + Clone> BulletPointPrinter<W> {
    pub fn with_writer(writer: W) -> Self {
        Self { writer, nesting: 0 }
    }

    pub fn print_item(&self, message: impl std::fmt::Display) {
        let indent = " ".repeat(self.nesting * INDENT_SIZE);
        self.writer.write_line(&format!("{}• {}", indent, message));
    }

    pub fn indent(&self) -> Self {
        Self {
            writer: self.writer.clone(),
            nesting: self.nesting + 1,
        }
    }
}

impl BulletPointPrinter<StdoutLineWriter> {
    pub fn new() -> Self {
        Self::with_writer(StdoutLineWriter)
    }
}

pub trait LineWriter {
    fn write_line(&self, line: &str);
}

#[derive(Clone, Copy)]
pub struct StdoutLineWriter;
impl LineWriter for StdoutLineWriter {
    fn write_line(&self, line: &str) {
        println!("{}", line);
    }
}

/// Collects lines in memory, all clones share the same buffer.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MemoryLineWriter {
    lines: Rc<RefCell<Vec<String>>>,
}

#[cfg(test)]
impl MemoryLineWriter {
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

#[cfg(test)]
impl LineWriter for MemoryLineWriter {
    fn write_line(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}

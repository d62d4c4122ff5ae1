//! Output surfaces the driver draws on

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Stdout, Write};

/// Something that can be cleared and written to
pub trait DisplaySurface {
    fn clear(&mut self) -> io::Result<()>;
    fn write(&mut self, text: &str) -> io::Result<()>;
}

impl<D: DisplaySurface + ?Sized> DisplaySurface for &mut D {
    fn clear(&mut self) -> io::Result<()> {
        (**self).clear()
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        (**self).write(text)
    }
}

/// Terminal display, stdout unless built with another writer
#[derive(Debug)]
pub struct ConsoleDisplay<W: Write = Stdout> {
    out: W,
}

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySurface for ConsoleDisplay<W> {
    fn clear(&mut self) -> io::Result<()> {
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

/// In-memory display that records everything drawn on it
///
/// Each `clear` starts a new frame.
#[derive(Debug, Clone)]
pub struct MemoryDisplay {
    frames: Vec<String>,
    clears: usize,
}

impl MemoryDisplay {
    pub fn new() -> Self {
        Self {
            frames: vec![String::new()],
            clears: 0,
        }
    }

    /// Text written since the last clear
    pub fn current(&self) -> &str {
        self.frames.last().map(String::as_str).unwrap_or_default()
    }

    /// Every frame, oldest first
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// Number of times the surface was cleared
    pub fn clears(&self) -> usize {
        self.clears
    }

    /// All text ever written, frames joined in order
    pub fn transcript(&self) -> String {
        self.frames.concat()
    }
}

impl Default for MemoryDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySurface for MemoryDisplay {
    fn clear(&mut self) -> io::Result<()> {
        self.clears += 1;
        self.frames.push(String::new());
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        if let Some(frame) = self.frames.last_mut() {
            frame.push_str(text);
        }
        Ok(())
    }
}

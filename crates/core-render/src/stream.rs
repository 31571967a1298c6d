//! Writes text with embedded color tokens through a [`TerminalDriver`].
//!
//! Literal runs are buffered and written under the attributes in effect when
//! they were produced. Consecutive tokens are folded into one attribute
//! update, pushed to the driver before the next literal run.

use anyhow::Result;
use core_terminal::{Attributes, TerminalDriver};
use tracing::trace;

use crate::lexer::{Lexer, Segment};

pub struct ColorOutputStream<'d, D: TerminalDriver + ?Sized> {
    driver: &'d mut D,
    attrs: Attributes,
    dirty: bool,
}

impl<'d, D: TerminalDriver + ?Sized> ColorOutputStream<'d, D> {
    pub fn new(driver: &'d mut D) -> Self {
        let attrs = driver.attributes();
        Self {
            driver,
            attrs,
            dirty: false,
        }
    }

    pub fn attributes(&self) -> Attributes {
        self.attrs
    }

    pub fn driver(&mut self) -> &mut D {
        &mut *self.driver
    }

    pub fn write(&mut self, text: &str) -> Result<()> {
        let mut run = String::new();
        let mut tokens = 0usize;
        for seg in Lexer::new(text) {
            match seg {
                Segment::Literal(s) => {
                    if self.dirty {
                        self.driver.set_attributes(self.attrs)?;
                        self.dirty = false;
                    }
                    run.push_str(s);
                }
                Segment::Color(token) => {
                    if !run.is_empty() {
                        self.driver.write_str(&run)?;
                        run.clear();
                    }
                    self.attrs = self.attrs.apply(&token);
                    self.dirty = true;
                    tokens += 1;
                }
            }
        }
        if !run.is_empty() {
            self.driver.write_str(&run)?;
        }
        if self.dirty {
            self.driver.set_attributes(self.attrs)?;
            self.dirty = false;
        }
        trace!(target: "render", tokens, "stream_write");
        Ok(())
    }
}

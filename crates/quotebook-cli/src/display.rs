//! Terminal display surface

use quotebook_core::{CategoryFilter, DisplaySurface, NoticeLevel, Quote};

use crate::output::Output;

/// Renders quotes and notices through the CLI output helper
pub struct TerminalDisplay<'a> {
    output: &'a Output,
}

impl<'a> TerminalDisplay<'a> {
    pub fn new(output: &'a Output) -> Self {
        Self { output }
    }
}

impl DisplaySurface for TerminalDisplay<'_> {
    fn show_quote(&mut self, quote: &Quote) {
        self.output.print_quote(quote);
    }

    fn show_empty(&mut self, filter: &CategoryFilter) {
        self.output.print_no_quote(filter);
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Success => self.output.success(message),
            NoticeLevel::Info => self.output.message(message),
            NoticeLevel::Warning => self.output.warning(message),
        }
    }
}

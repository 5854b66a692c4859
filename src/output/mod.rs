pub mod formatter;
pub mod palette;

use std::io::Write;

use crate::catalog::{DetailPane, Record, RenderGateway, RenderMode};
use crate::cli::OutputFormat;
use crate::error::Result;
pub use formatter::Formatter;

/// Renders cards and detail views as text on a writer (stdout in the CLI)
pub struct TerminalRenderer<W: Write> {
    out: W,
    formatter: Formatter,
    format: OutputFormat,
    /// Print nothing for card batches; used when only a detail view is wanted
    cards_muted: bool,
    /// Hold back detail views until `flush_detail`
    detail_deferred: bool,
    pending_detail: Option<String>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            formatter: Formatter::new(format),
            format,
            cards_muted: false,
            detail_deferred: false,
            pending_detail: None,
        }
    }

    /// Keep only the latest detail view instead of printing each one
    pub fn defer_detail(&mut self, deferred: bool) {
        self.detail_deferred = deferred;
    }

    /// Print the detail view held back while deferred
    pub fn flush_detail(&mut self) -> Result<()> {
        if let Some(text) = self.pending_detail.take() {
            self.out.write_all(text.as_bytes())?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn mute_cards(&mut self, muted: bool) {
        self.cards_muted = muted;
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderGateway for TerminalRenderer<W> {
    fn render_cards(&mut self, records: &[&Record], mode: RenderMode) -> Result<()> {
        if self.cards_muted {
            return Ok(());
        }
        if mode == RenderMode::Replace && matches!(self.format, OutputFormat::Table) {
            writeln!(self.out)?;
        }
        let text = self.formatter.format_cards(records)?;
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn render_detail(
        &mut self,
        record: &Record,
        position: usize,
        total: usize,
        pane: DetailPane,
    ) -> Result<()> {
        let text = self.formatter.format_detail(record, position, total, pane)?;
        if self.detail_deferred {
            self.pending_detail = Some(text);
            return Ok(());
        }
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn close_detail(&mut self) -> Result<()> {
        self.pending_detail = None;
        Ok(())
    }
}

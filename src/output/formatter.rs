use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use rust_i18n::t;
use serde_json::json;

use super::palette::{accent_for, accent_hex};
use crate::catalog::{DetailPane, Record};
use crate::cli::OutputFormat;
use crate::error::{DexError, Result};

/// Highest base stat the bars are scaled to
const STAT_SCALE: u32 = 255;
const BAR_WIDTH: usize = 30;

/// Horizontal bar for a stat value
pub fn stat_bar(value: u32, width: usize) -> String {
    let filled = (value.min(STAT_SCALE) as usize * width).div_ceil(STAT_SCALE as usize);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format a batch of cards
    pub fn format_cards(&self, records: &[&Record]) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_cards_table(records)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
            OutputFormat::Markdown => Ok(self.format_cards_markdown(records)),
            OutputFormat::Csv => self.format_cards_csv(records),
        }
    }

    /// Format the detail view of one record
    pub fn format_detail(
        &self,
        record: &Record,
        position: usize,
        total: usize,
        pane: DetailPane,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_detail_text(record, position, total, pane)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "position": position + 1,
                "total": total,
                "record": record,
            }))?),
            OutputFormat::Markdown => Ok(self.format_detail_markdown(record, position, total)),
            OutputFormat::Csv => self.format_stats_csv(record),
        }
    }

    fn format_cards_table(&self, records: &[&Record]) -> String {
        if records.is_empty() {
            return format!("{}\n", t!("cards.empty").yellow());
        }

        let mut table = Table::new();
        table
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("#").fg(Color::Cyan),
                Cell::new(t!("card.name")).fg(Color::Cyan),
                Cell::new(t!("card.categories")).fg(Color::Cyan),
                Cell::new(t!("card.image")).fg(Color::Cyan),
            ]);

        for record in records {
            let (r, g, b) = record
                .primary_category()
                .map(accent_for)
                .unwrap_or((0xFF, 0xFF, 0xFF));
            table.add_row(vec![
                Cell::new(format!("#{}", record.id)),
                Cell::new(record.display_name().to_uppercase()).fg(Color::Rgb { r, g, b }),
                Cell::new(record.categories.join(", ")),
                Cell::new(&record.image_ref),
            ]);
        }

        format!(
            "{}\n{}\n",
            table,
            t!("cards.summary", count = records.len()).dimmed()
        )
    }

    fn format_cards_markdown(&self, records: &[&Record]) -> String {
        let mut result = format!(
            "| # | {} | {} |\n|---|---|---|\n",
            t!("card.name"),
            t!("card.categories")
        );
        for record in records {
            result.push_str(&format!(
                "| {} | {} | {} |\n",
                record.id,
                record.display_name().replace('|', "\\|"),
                record.categories.join(", ")
            ));
        }
        result
    }

    fn format_cards_csv(&self, records: &[&Record]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["id", "canonical_name", "localized_name", "categories", "image_ref"])?;
        for record in records {
            writer.write_record([
                record.id.to_string(),
                record.canonical_name.clone(),
                record.localized_name.clone().unwrap_or_default(),
                record.categories.join("/"),
                record.image_ref.clone(),
            ])?;
        }
        Self::finish_csv(writer)
    }

    fn format_stats_csv(&self, record: &Record) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["id", "stat", "value"])?;
        for stat in &record.stats {
            writer.write_record([record.id.to_string(), stat.name.clone(), stat.value.to_string()])?;
        }
        Self::finish_csv(writer)
    }

    fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
        let bytes = writer
            .into_inner()
            .map_err(|e| DexError::Other(format!("Failed to flush CSV output: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| DexError::Other(format!("CSV output is not UTF-8: {}", e)))
    }

    fn format_detail_text(
        &self,
        record: &Record,
        position: usize,
        total: usize,
        pane: DetailPane,
    ) -> String {
        let (r, g, b) = record
            .primary_category()
            .map(accent_for)
            .unwrap_or((0xFF, 0xFF, 0xFF));

        let mut result = format!(
            "\n{}  {}  {}\n",
            record.display_name().to_uppercase().truecolor(r, g, b).bold(),
            format!("#{}", record.id).yellow(),
            format!("({}/{})", position + 1, total).dimmed()
        );
        result.push_str(&format!("{}\n", "─".repeat(50)));

        match pane {
            DetailPane::Info => {
                result.push_str(&format!("{} {}\n", t!("detail.id").bold(), record.id));
                result.push_str(&format!(
                    "{} {}\n",
                    t!("detail.categories").bold(),
                    record.categories.join(", ")
                ));
                if !record.image_ref.is_empty() {
                    result.push_str(&format!("{} {}\n", t!("card.image").bold(), record.image_ref));
                }
            }
            DetailPane::Stats => {
                result.push_str(&format!("{}\n", t!("detail.stats").bold()));
                let label_width = record
                    .stats
                    .iter()
                    .map(|s| s.name.chars().count())
                    .max()
                    .unwrap_or(0);
                for stat in &record.stats {
                    result.push_str(&format!(
                        "  {:<width$}  {:>3}  {}\n",
                        stat.name,
                        stat.value,
                        stat_bar(stat.value, BAR_WIDTH).truecolor(r, g, b),
                        width = label_width
                    ));
                }
            }
        }

        result
    }

    fn format_detail_markdown(&self, record: &Record, position: usize, total: usize) -> String {
        let accent = record.primary_category().map(accent_hex).unwrap_or_default();
        let mut result = format!(
            "## {} (#{})\n\n_{}/{}_\n\n**{}** {} `{}`\n\n### {}\n\n| Stat | Value |\n|---|---|\n",
            record.display_name(),
            record.id,
            position + 1,
            total,
            t!("detail.categories"),
            record.categories.join(", "),
            accent,
            t!("detail.stats")
        );
        for stat in &record.stats {
            result.push_str(&format!("| {} | {} |\n", stat.name, stat.value));
        }
        result
    }
}

use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use camwire_frame::CanonicalFrame;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use sha2::{Digest, Sha256};

const SHORT_CHECKSUM_LEN: usize = 12;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    sequence: u64,
    topic: Option<&'a str>,
    rows: i32,
    cols: i32,
    element_type: &'a str,
    channels: usize,
    size: usize,
    checksum: String,
    timestamp: String,
}

pub fn print_frame(frame: &CanonicalFrame, sequence: u64, format: OutputFormat) {
    println!("{}", render_frame(frame, sequence, format));
}

pub fn render_frame(frame: &CanonicalFrame, sequence: u64, format: OutputFormat) -> String {
    let topic = frame.topic().unwrap_or("-");
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                sequence,
                topic: frame.topic(),
                rows: frame.rows(),
                cols: frame.cols(),
                element_type: frame.element_type().as_str(),
                channels: frame.element_type().channels(),
                size: frame.buffer().len(),
                checksum: checksum(frame.buffer()),
                timestamp: now_unix_seconds(),
            };
            serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "TOPIC", "SHAPE", "TYPE", "SIZE", "CHECKSUM"])
                .add_row(vec![
                    sequence.to_string(),
                    topic.to_string(),
                    format!("{}x{}", frame.rows(), frame.cols()),
                    frame.element_type().to_string(),
                    frame.buffer().len().to_string(),
                    short_checksum(frame.buffer()),
                ]);
            table.to_string()
        }
        OutputFormat::Pretty => format!(
            "frame #{sequence} topic={topic} shape={}x{} type={} size={} checksum={}",
            frame.rows(),
            frame.cols(),
            frame.element_type(),
            frame.buffer().len(),
            short_checksum(frame.buffer())
        ),
    }
}

/// SHA-256 of the pixel bytes, hex encoded.
fn checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Leading digest characters shown in the table and pretty views.
fn short_checksum(data: &[u8]) -> String {
    let mut digest = checksum(data);
    digest.truncate(SHORT_CHECKSUM_LEN);
    digest
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

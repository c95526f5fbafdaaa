// src/fastq.rs

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::types::SequenceRecord;

/// Read FASTQ or FASTA records, plain or gzip-compressed, into
/// `(id, sequence)` pairs. The format is chosen from the file name; `.gz`
/// inputs are wrapped in a `MultiGzDecoder`.
pub fn read_sequence_records<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<SequenceRecord>> {
    let path = path.as_ref();
    let f = File::open(path)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let is_gz = name.ends_with(".gz");
    let stem = name.strip_suffix(".gz").unwrap_or(&name);

    let reader: Box<dyn BufRead> = if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };

    if stem.ends_with(".fasta") || stem.ends_with(".fa") || stem.ends_with(".fas") {
        read_fasta(reader)
    } else {
        read_fastq(reader)
    }
}

fn read_fastq(mut reader: Box<dyn BufRead>) -> std::io::Result<Vec<SequenceRecord>> {
    let mut records = Vec::new();
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let header = line.trim_end().to_string();
        if !header.starts_with('@') {
            continue;
        }
        let id = header[1..].split(' ').next().unwrap_or_default().to_string();

        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let seq = line.trim_end().to_string();

        // Plus line and quality line are read and discarded; only the
        // identifier and the bases feed the graph.
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }

        records.push(SequenceRecord { id, seq });
    }
    Ok(records)
}

fn read_fasta(reader: Box<dyn BufRead>) -> std::io::Result<Vec<SequenceRecord>> {
    let mut records = Vec::new();
    let mut id: Option<String> = None;
    let mut seq = String::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end();
        if let Some(header) = line.strip_prefix('>') {
            if let Some(prev) = id.take() {
                records.push(SequenceRecord {
                    id: prev,
                    seq: std::mem::take(&mut seq),
                });
            }
            id = Some(header.split(' ').next().unwrap_or_default().to_string());
        } else if id.is_some() {
            seq.push_str(line);
        }
    }
    if let Some(prev) = id {
        records.push(SequenceRecord { id: prev, seq });
    }
    Ok(records)
}

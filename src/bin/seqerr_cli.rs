use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use seqerr_rs::fastq::read_sequence_records;
use seqerr_rs::graph::EditDistance;
use seqerr_rs::{extract_training_data, grouped_csv, Config};

fn spinner(color: &str, msg: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
            ])
            .template(&format!("{{spinner:.{color}}} {{msg}}"))
            .expect("Invalid spinner template"),
    );
    bar.set_message(msg.to_string());
    bar
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let input = match args.next() {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("usage: seqerr-rs <reads.fastq[.gz]|reads.fasta[.gz]> [1|2]");
            return ExitCode::FAILURE;
        }
    };
    let mode = match args.next().as_deref() {
        None | Some("1") => EditDistance::One,
        Some("2") => EditDistance::Two,
        Some(other) => {
            eprintln!("unsupported edit distance {other:?}; expected 1 or 2");
            return ExitCode::FAILURE;
        }
    };

    let config = Config {
        num_workers: std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1),
        high_ambiguous: std::env::var_os("SEQERR_HIGH_AMBIGUOUS").is_some(),
        verbose: std::env::var_os("SEQERR_VERBOSE").is_some(),
        ..Config::default()
    };

    // 1. Read the input records
    let bar = spinner("blue", &format!("Reading records from {}...", input.display()));
    let records = match read_sequence_records(&input) {
        Ok(records) => records,
        Err(err) => {
            bar.finish_and_clear();
            eprintln!("failed to read {}: {err}", input.display());
            return ExitCode::FAILURE;
        }
    };
    bar.finish_with_message(format!("Read {} record(s).", records.len()));

    // 2. Build the graph and extract error samples
    let bar = spinner("green", "Building read graph and extracting samples...");
    let results = match extract_training_data(&records, mode, &config) {
        Ok(results) => results,
        Err(err) => {
            bar.finish_and_clear();
            eprintln!("extraction failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    bar.finish_with_message(format!(
        "Extracted {} genuine, {} ambiguous group(s), {} negative(s).",
        results.genuine.len(),
        results.ambiguous.len(),
        results.negative.len()
    ));

    // 3. Write the output tables
    let bar = spinner("yellow", "Writing output files...");
    let suffix = mode.value();
    let outputs = [
        (format!("genuine{suffix}.csv"), results.genuine_csv()),
        (format!("ambiguous{suffix}.csv"), results.ambiguous_csv()),
        (format!("negative{suffix}.csv"), results.negative_csv()),
    ];
    for (name, text) in &outputs {
        if let Err(err) = fs::write(name, text) {
            bar.finish_and_clear();
            eprintln!("could not write {name}: {err}");
            return ExitCode::FAILURE;
        }
    }
    if let Some(groups) = &results.high_ambiguous {
        if let Err(err) = fs::write("high_ambiguous1.csv", grouped_csv(groups)) {
            bar.finish_and_clear();
            eprintln!("could not write high_ambiguous1.csv: {err}");
            return ExitCode::FAILURE;
        }
    }

    // Graph snapshot for persistence/visualization collaborators.
    if config.verbose {
        let view = results.graph_view();
        let mut nodes_text = String::from("Sequence,Count,Degree\n");
        for (seq, count, degree) in &view.nodes {
            nodes_text.push_str(&format!("{seq},{count},{degree}\n"));
        }
        let mut edges_text = String::from("StartRead,EndRead\n");
        for (a, b) in &view.edges {
            edges_text.push_str(&format!("{a},{b}\n"));
        }
        if let Err(err) = fs::write(format!("graph{suffix}_nodes.csv"), nodes_text)
            .and_then(|_| fs::write(format!("graph{suffix}_edges.csv"), edges_text))
        {
            bar.finish_and_clear();
            eprintln!("could not write graph view: {err}");
            return ExitCode::FAILURE;
        }
    }

    // Isolate/non-isolate id lists for downstream file export.
    let isolated = results.id_partition.isolated.join("\n");
    let non_isolated = results.id_partition.non_isolated.join("\n");
    if let Err(err) = fs::write("isolated_ids.txt", isolated)
        .and_then(|_| fs::write("non_isolated_ids.txt", non_isolated))
    {
        bar.finish_and_clear();
        eprintln!("could not write id lists: {err}");
        return ExitCode::FAILURE;
    }
    bar.finish_with_message("Output files created.");

    ExitCode::SUCCESS
}

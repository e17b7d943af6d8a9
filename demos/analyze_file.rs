//! Example: Analyze a single audio file
//!
//! Usage:
//!   cargo run --release --example analyze_file -- [--config config.json] [--json] <file>
//!
//! `--config` reads a (possibly partial) JSON `AnalysisConfig`.

use rhythmic_dsp::{AnalysisConfig, AnalysisError, TempoAnalyzer};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut json = false;
    let mut config = AnalysisConfig::default();
    let mut source: Option<String> = None;

    while !args.is_empty() {
        let a = args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--config" => {
                if args.is_empty() {
                    return Err("--config requires a path".into());
                }
                let text = std::fs::read_to_string(args.remove(0))?;
                config = serde_json::from_str(&text)?;
            }
            "--help" | "-h" => {
                eprintln!("Usage: analyze_file [--config config.json] [--json] <file>");
                return Ok(());
            }
            _ => source = Some(a),
        }
    }

    let Some(source) = source else {
        eprintln!("ERROR: Provide an audio file path. Use --help for usage.");
        std::process::exit(2);
    };

    let analyzer = TempoAnalyzer::with_config(config);
    match analyzer.analyze_file(&source) {
        Ok(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Analysis Results:");
                println!(
                    "  BPM: {:.2} (confidence: {:.2})",
                    result.tempo.bpm, result.tempo.confidence
                );
                println!("  Beat period: {:.3} s", result.tempo.period_seconds());
                for (rank, c) in result.candidates.iter().take(5).enumerate() {
                    println!("  #{} {:.2} BPM (score {:.3})", rank + 1, c.bpm, c.score);
                }
                println!("  Flags: {:?}", result.metadata.flags);
                println!("  Processing time: {:.2} ms", result.metadata.processing_time_ms);
            }
            Ok(())
        }
        Err(AnalysisError::NoDominantTempo(reason)) => {
            println!("No dominant tempo: {}", reason);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

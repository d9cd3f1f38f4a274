use std::{env, path::PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use ragkit_chunking::pipeline::{list_txt_files, DocumentPipeline};
use ragkit_core::config::Config;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let args: Vec<String> = env::args().skip(1).collect();
    let mut data_dir = None;
    let mut limit = None;
    let mut json_output = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" | "-j" => json_output = true,
            "--limit" => {
                if i + 1 < args.len() {
                    if let Ok(n) = args[i + 1].parse::<usize>() {
                        limit = Some(n);
                        i += 1;
                    } else {
                        eprintln!("Error: --limit requires a number");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("Error: --limit requires a number");
                    std::process::exit(1);
                }
            }
            _ if !args[i].starts_with('-') => data_dir = Some(PathBuf::from(&args[i])),
            _ => {}
        }
        i += 1;
    }
    let data_dir = data_dir.unwrap_or_else(|| {
        let dir: String = config
            .get("data.raw_txt_dir")
            .unwrap_or_else(|_| "./data/txt".to_string());
        PathBuf::from(dir)
    });

    let chunking = config.chunking()?;
    println!("ragkit chunker\n==============");
    println!("Data directory: {}", data_dir.display());
    println!(
        "Bounds: target={} overlap={} min={} max={}",
        chunking.target_token_size, chunking.overlap_tokens, chunking.min_tokens, chunking.max_tokens
    );

    let pipeline = DocumentPipeline::new(chunking)?;
    let mut files = list_txt_files(&data_dir);
    if let Some(n) = limit {
        files.truncate(n);
    }
    if files.is_empty() {
        println!("No .txt files found under {}.", data_dir.display());
        return Ok(());
    }

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        "{bar:40} {pos}/{len} {msg}",
    )?);
    let mut documents = Vec::with_capacity(files.len());
    for file in &files {
        bar.set_message(
            file.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        );
        let mut batch = pipeline.process_files(std::slice::from_ref(file))?;
        documents.append(&mut batch);
        bar.inc(1);
    }
    bar.finish_and_clear();

    let total_chunks: usize = documents.iter().map(|d| d.chunks.len()).sum();
    let total_rejected: usize = documents.iter().map(|d| d.rejected.len()).sum();
    println!(
        "Processed {} files into {} chunks ({} rejected)",
        documents.len(),
        total_chunks,
        total_rejected
    );
    for doc in &documents {
        println!(
            "  {}: {:?} ({:?}, confidence {:.2}) -> {} chunks",
            doc.doc_id,
            doc.decision.strategy,
            doc.decision.tier,
            doc.decision.confidence,
            doc.chunks.len()
        );
        for (chunk, reason) in &doc.rejected {
            eprintln!("  rejected {}: {}", chunk.id, reason);
        }
    }

    if json_output {
        let all: Vec<_> = documents.iter().flat_map(|d| d.chunks.iter()).collect();
        println!("{}", serde_json::to_string_pretty(&all)?);
    }
    Ok(())
}

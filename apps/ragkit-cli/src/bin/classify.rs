use std::{env, fs, path::PathBuf};

use ragkit_chunking::classifier::{build_profile, classify};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = match env::args().nth(1) {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("Usage: ragkit-classify <file.txt>");
            std::process::exit(1);
        }
    };
    let text = fs::read_to_string(&path)?;

    // no structural hints for a raw text file: text-only scoring with
    // reduced confidence
    let profile = build_profile(&text, None);
    let decision = classify(&text, None);

    println!("ragkit classifier\n=================");
    println!("File: {}", path.display());
    println!(
        "Pages: {}  Headings: {}  Tables: {}",
        profile.page_count, profile.heading_count, profile.table_count
    );
    println!(
        "Avg sentence tokens: {:.1}  Paragraph mean/variance: {:.1}/{:.1}  RTL ratio: {:.2}",
        profile.avg_sentence_tokens,
        profile.paragraph_token_mean,
        profile.paragraph_token_variance,
        profile.rtl_ratio
    );
    println!(
        "Factors: structural={:.3} lexical={:.3} layout={:.3} composite={:.3}",
        decision.factors.structural_density,
        decision.factors.lexical_density,
        decision.factors.layout_irregularity,
        decision.factors.composite
    );
    println!(
        "Decision: {:?} ({:?}), confidence {:.2}",
        decision.strategy, decision.tier, decision.confidence
    );
    Ok(())
}

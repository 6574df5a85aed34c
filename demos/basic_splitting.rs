//! Basic Text Splitting
//!
//! The minimal example: split a document for embedding, first by structure,
//! then by topic.
//!
//! ```bash
//! RUST_LOG=kerf=debug cargo run --example basic_splitting
//! ```

use kerf::{
    CancellationToken, FnGenerator, RecursiveSplitter, SemanticSplitter,
    SemanticTextSplitterOptions, TextSplitter, TextSplitterOptions,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let document = "Machine learning models learn patterns from data. \
        They generalize these patterns to make predictions.\n\n\
        Deep learning extends this with multiple hidden layers. \
        Each layer learns increasingly abstract representations.\n\n\
        The weather today is sunny. It is warm outside.";

    // Structure first: paragraphs, then lines, words, characters.
    let splitter = RecursiveSplitter::new(TextSplitterOptions::prose(120));
    let chunks = splitter.split(document)?;

    println!("Document: {} chars", document.chars().count());
    println!("Recursive chunks: {}\n", chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        println!("[{}] {} chars: {:?}", i, chunk.chars().count(), chunk);
    }

    // Topic next. A real generator calls an embedding model; this one
    // scores each text on a "learning" axis and a "weather" axis.
    let generator = FnGenerator::new(|texts: Vec<String>, _cancel: CancellationToken| async move {
        anyhow::Ok(
            texts
                .iter()
                .map(|t| {
                    let learning = ["learn", "layer", "model"]
                        .iter()
                        .filter(|w| t.contains(*w))
                        .count();
                    let weather = ["weather", "sunny", "warm"]
                        .iter()
                        .filter(|w| t.contains(*w))
                        .count();
                    vec![learning as f32, weather as f32, 0.1]
                })
                .collect::<Vec<_>>(),
        )
    });

    let options = SemanticTextSplitterOptions::default().with_buffer_size(0);
    let splitter = SemanticSplitter::new(generator, options);
    let chunks = splitter.split(document, &CancellationToken::new()).await?;

    println!("\nSemantic chunks: {}\n", chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        println!("[{i}] {chunk:?}");
    }

    Ok(())
}

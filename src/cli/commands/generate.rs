//! Generate command - chapter a single video from the command line.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::{ChapterResponse, Orchestrator, VideoRequest};
use anyhow::Result;
use console::style;

/// Run the generate command.
pub async fn run_generate(url: &str, language: Option<String>, json: bool, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(&settings)?;
    let request = VideoRequest::new(url, language);

    let spinner = (!json).then(|| Output::spinner("Fetching transcript and generating chapters..."));
    let result = orchestrator.generate_chapters(&request).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let response = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }

    Ok(())
}

fn print_response(response: &ChapterResponse) {
    Output::header(&format!("Chapters for {}", response.video_id));
    Output::kv("Language", &response.language);
    Output::kv("Transcript entries", &response.transcript.len().to_string());
    Output::kv(
        "Draft chapters",
        &response.initial_chapters.len().to_string(),
    );
    println!();

    if response.chapters.is_empty() {
        Output::warning("The model did not return any chapters.");
        return;
    }

    for chapter in &response.chapters {
        println!(
            "  {} {}",
            style(&chapter.timestamp).cyan(),
            style(&chapter.title).bold()
        );
    }
}

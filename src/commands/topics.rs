use crate::api::BlogPlanner;
use console::style;
use spinners::{Spinner, Spinners};

/// Brainstorm topic ideas and print them as a numbered list or JSON.
pub async fn run(
    planner: &BlogPlanner,
    theme: &str,
    count: Option<usize>,
    json: bool,
) -> Result<(), String> {
    if theme.trim().is_empty() {
        return Err("Theme is required".to_string());
    }

    let mut runner = planner.topics(theme);
    if let Some(n) = count {
        runner = runner.count(n);
    }

    // Keep stdout clean for machine-readable output.
    let mut sp = (!json).then(|| Spinner::new(Spinners::Dots9, "Generating topic ideas...".into()));
    let outcome = runner.run().await;

    if let Some(err) = outcome.error {
        if let Some(sp) = sp.as_mut() {
            sp.stop_with_message("✖ Topic generation failed.".into());
        }
        return Err(err);
    }
    if let Some(sp) = sp.as_mut() {
        sp.stop_with_message("✔ Topics received.".into());
    }

    if json {
        let text = serde_json::to_string_pretty(&outcome.topics).map_err(|e| e.to_string())?;
        println!("{}", text);
        return Ok(());
    }

    if outcome.topics.is_empty() {
        println!("{}", style("No topics were generated.").yellow());
        return Ok(());
    }

    println!("\n{}", style("Topic Ideas").bold().underlined());
    print_topics(&outcome.topics);
    Ok(())
}

pub(crate) fn print_topics(topics: &[String]) {
    for (i, topic) in topics.iter().enumerate() {
        println!("{}. {}", style(i + 1).cyan(), topic);
    }
}

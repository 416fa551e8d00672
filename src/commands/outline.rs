use crate::api::{BlogOutline, BlogPlanner};
use crate::cli::OutlineFormat;
use console::style;
use spinners::{Spinner, Spinners};
use std::fs;
use std::path::Path;

/// Generate an outline and print it, or write it to `out`.
pub async fn run(
    planner: &BlogPlanner,
    topic: &str,
    audience: Option<&str>,
    format: OutlineFormat,
    out: Option<&Path>,
) -> Result<(), String> {
    if topic.trim().is_empty() {
        return Err("Topic is required".to_string());
    }

    let mut runner = planner.outline(topic);
    if let Some(a) = audience {
        runner = runner.audience(a);
    }

    let mut sp = Spinner::new(Spinners::Dots9, "Generating blog outline...".into());
    let outcome = runner.run().await;

    if let Some(err) = outcome.error {
        sp.stop_with_message("✖ Outline generation failed.".into());
        return Err(err);
    }
    let outline = match outcome.outline {
        Some(o) => o,
        None => {
            sp.stop_with_message("✖ Outline generation failed.".into());
            return Err("Failed to generate outline".to_string());
        }
    };
    sp.stop_with_message("✔ Outline received.".into());

    match out {
        Some(path) => {
            export(&outline, format, path)?;
            println!("Outline written to {}", style(path.display()).green());
        }
        None => println!("\n{}", render(&outline, format)?),
    }
    Ok(())
}

/// Renders an outline as pretty JSON or Markdown.
pub fn render(outline: &BlogOutline, format: OutlineFormat) -> Result<String, String> {
    match format {
        OutlineFormat::Json => serde_json::to_string_pretty(outline).map_err(|e| e.to_string()),
        OutlineFormat::Markdown => Ok(outline.to_markdown()),
    }
}

/// Writes the rendered outline to `path`.
pub fn export(outline: &BlogOutline, format: OutlineFormat, path: &Path) -> Result<(), String> {
    let content = render(outline, format)?;
    fs::write(path, content).map_err(|e| format!("Unable to write {}: {}", path.display(), e))
}

use crate::api::{BlogOutline, BlogPlanner, OutlineOutcome, TopicOutcome};
use crate::cli::OutlineFormat;
use crate::commands::{outline, topics};
use crate::core::config::MAX_NUM_TOPICS;
use console::style;
use dialoguer::{Input, Select};
use spinners::{Spinner, Spinners};
use std::path::Path;

enum Next {
    NewTheme,
    Quit,
}

/// Run a guided session: theme, topic ideas, pick one, outline, export.
pub async fn run(planner: &BlogPlanner) -> Result<(), String> {
    println!("Entering interactive mode. Leave the theme empty to quit.");
    loop {
        let theme: String = Input::new()
            .with_prompt(format!("{}", style("Blog theme").blue().bold()))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| format!("Input error: {}", e))?;
        let theme = theme.trim();
        if theme.is_empty() || theme.eq_ignore_ascii_case("exit") || theme.eq_ignore_ascii_case("quit") {
            break;
        }

        let count: usize = Input::new()
            .with_prompt("Number of topic ideas")
            .default(planner.config().default_num_topics)
            .validate_with(|n: &usize| -> Result<(), String> {
                if (1..=MAX_NUM_TOPICS).contains(n) {
                    Ok(())
                } else {
                    Err(format!("Choose between 1 and {}", MAX_NUM_TOPICS))
                }
            })
            .interact_text()
            .map_err(|e| format!("Input error: {}", e))?;

        let mut sp = Spinner::new(Spinners::Dots9, "Generating topic ideas...".into());
        let outcome = planner.run_topic_ideation(theme, count).await;
        sp.stop_with_newline();

        let ideas = match generated_topics(outcome) {
            Ok(ideas) => ideas,
            Err(err) => {
                eprintln!("• {}", style(err).red());
                continue;
            }
        };
        if ideas.is_empty() {
            println!("{}", style("No topics were generated.").yellow());
            continue;
        }

        println!("\n{}", style("Topic Ideas").bold().underlined());
        topics::print_topics(&ideas);

        match pick_and_outline(planner, &ideas).await? {
            Next::NewTheme => continue,
            Next::Quit => break,
        }
    }
    Ok(())
}

async fn pick_and_outline(planner: &BlogPlanner, topics: &[String]) -> Result<Next, String> {
    let mut items: Vec<String> = topics.to_vec();
    items.push("« New theme".to_string());

    loop {
        let choice = Select::new()
            .with_prompt("Select a topic to outline")
            .items(&items)
            .default(0)
            .interact()
            .map_err(|e| format!("Input error: {}", e))?;
        if choice == topics.len() {
            return Ok(Next::NewTheme);
        }
        let topic = &topics[choice];

        let audience: String = Input::new()
            .with_prompt("Target audience")
            .default(planner.config().default_audience.clone())
            .interact_text()
            .map_err(|e| format!("Input error: {}", e))?;

        let mut sp = Spinner::new(Spinners::Dots9, "Generating blog outline...".into());
        let outcome = planner.run_outline_generation(topic, Some(audience.as_str())).await;
        sp.stop_with_newline();

        let generated = match generated_outline(outcome) {
            Ok(o) => o,
            Err(err) => {
                eprintln!("• {}", style(err).red());
                continue;
            }
        };

        println!("\n{}", generated.to_markdown());
        if let Some(next) = after_outline(&generated)? {
            return Ok(next);
        }
    }
}

/// Offers exports for the outline. `None` means pick another topic.
fn after_outline(generated: &BlogOutline) -> Result<Option<Next>, String> {
    let actions = [
        "Export outline as JSON",
        "Export outline as Markdown",
        "Choose another topic",
        "New theme",
        "Quit",
    ];
    loop {
        let action = Select::new()
            .with_prompt("What next?")
            .items(&actions)
            .default(0)
            .interact()
            .map_err(|e| format!("Input error: {}", e))?;

        let (format, default_name) = match action {
            0 => (OutlineFormat::Json, "blog_outline.json"),
            1 => (OutlineFormat::Markdown, "blog_outline.md"),
            2 => return Ok(None),
            3 => return Ok(Some(Next::NewTheme)),
            _ => return Ok(Some(Next::Quit)),
        };

        let file: String = Input::new()
            .with_prompt("File name")
            .default(default_name.to_string())
            .interact_text()
            .map_err(|e| format!("Input error: {}", e))?;

        match outline::export(generated, format, Path::new(&file)) {
            Ok(()) => println!("Outline written to {}", style(&file).green()),
            Err(e) => eprintln!("• {}", style(e).red()),
        }
    }
}

/// The workflow's error message is shown as recorded.
fn generated_topics(outcome: TopicOutcome) -> Result<Vec<String>, String> {
    match outcome.error {
        Some(err) => Err(err),
        None => Ok(outcome.topics),
    }
}

fn generated_outline(outcome: OutlineOutcome) -> Result<BlogOutline, String> {
    match (outcome.error, outcome.outline) {
        (Some(err), _) => Err(err),
        (None, None) => Err("Failed to generate outline".to_string()),
        (None, Some(o)) => Ok(o),
    }
}

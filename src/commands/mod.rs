use crate::api::BlogPlanner;
use crate::cli::Cmd;

pub mod interactive;
pub mod outline;
pub mod serve;
pub mod topics;

/// Dispatches the parsed command to the appropriate handler.
pub async fn dispatch(command: Cmd, planner: &BlogPlanner) -> Result<(), String> {
    match command {
        Cmd::Topics { theme, count, json } => {
            topics::run(planner, &theme, count.map(|c| c as usize), json).await
        }
        Cmd::Outline {
            topic,
            audience,
            format,
            out,
        } => outline::run(planner, &topic, audience.as_deref(), format, out.as_deref()).await,
        Cmd::Serve { listen } => serve::run(planner, listen).await,
        Cmd::Interactive => interactive::run(planner).await,
    }
}

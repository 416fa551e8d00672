use crate::api::BlogPlanner;
use crate::server;
use console::style;
use std::net::SocketAddr;

/// Serve the JSON API until interrupted.
pub async fn run(planner: &BlogPlanner, listen: SocketAddr) -> Result<(), String> {
    println!(
        "{} http://{}",
        style("blog-planner API listening on").green(),
        listen
    );
    server::serve(planner.clone(), listen).await
}

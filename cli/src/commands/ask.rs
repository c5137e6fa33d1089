use std::sync::Arc;

use clap::Args;
use mira_core::{ChatSession, QuickFilters};
use serde_json::json;

use crate::util::{Connection, EXIT_FAILED, exit_error, print_json};

#[derive(Args)]
pub struct AskArgs {
    /// What to ask the assistant (e.g. "2BHK in Pune under 1Cr")
    pub message: Option<String>,

    /// City filter, used when no message is given
    #[arg(long, conflicts_with = "message")]
    pub location: Option<String>,

    /// Budget band (e.g. "50L-1Cr"), used when no message is given
    #[arg(long, conflicts_with = "message")]
    pub budget: Option<String>,

    /// Bedroom count, used when no message is given
    #[arg(long, conflicts_with = "message")]
    pub bedrooms: Option<String>,
}

/// One-shot session: greeting, one request, print the transcript.
pub async fn run(conn: Connection, args: AskArgs) -> i32 {
    let gateway = Arc::new(conn.gateway);
    let session = ChatSession::new(conn.context, gateway.clone(), gateway);

    let outcome = match args.message {
        Some(message) => session.submit_text(&message).await,
        None => {
            let filters = QuickFilters::new(args.location, args.budget, args.bedrooms);
            session.apply_quick_filter(&filters).await
        }
    };

    if outcome.is_skipped() {
        exit_error(
            "Nothing to ask: the message is empty and no filters were given.",
            Some("mira ask \"2BHK in Pune under 1Cr\"  or  mira ask --location Pune --bedrooms 2"),
        );
    }

    let code = print_json(&json!({ "transcript": session.transcript() }));
    if outcome.is_failure() { EXIT_FAILED } else { code }
}

use std::sync::Arc;

use clap::Args;
use mira_core::{ChatSession, Outcome};
use mira_core::gateway::SavedPropertiesGateway;
use serde_json::json;

use crate::util::{Connection, EXIT_FAILED, exit_error, print_json, report_gateway_error};

#[derive(Args)]
pub struct SaveArgs {
    /// Listing id as shown on the property card
    #[arg(long)]
    pub property_id: String,
}

pub async fn save(conn: Connection, args: SaveArgs) -> i32 {
    let gateway = Arc::new(conn.gateway);
    let session = ChatSession::new(conn.context, gateway.clone(), gateway);

    match session.save(&args.property_id).await {
        Outcome::Skipped(_) => exit_error(
            "property id must not be empty",
            Some("mira save --property-id <id>"),
        ),
        outcome => {
            let code = print_json(&json!({
                "user_id": session.context().user_id(),
                "property_id": args.property_id.trim(),
                "entry": outcome.entry(),
            }));
            if outcome.is_failure() { EXIT_FAILED } else { code }
        }
    }
}

pub async fn saved(conn: Connection) -> i32 {
    let user_id = conn.context.user_id();
    match conn.gateway.list_saved(user_id).await {
        Ok(ids) => print_json(&json!({
            "user_id": user_id,
            "saved_properties": ids,
        })),
        Err(e) => report_gateway_error(&e),
    }
}

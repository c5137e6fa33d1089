use clap::Args;
use mira_core::QuickFilters;
use mira_core::gateway::PropertySearchGateway;
use serde_json::json;

use crate::util::{Connection, print_json, report_gateway_error};

#[derive(Args)]
pub struct SearchArgs {
    /// City (e.g. "Mumbai")
    #[arg(long)]
    pub location: Option<String>,
    /// Budget band (e.g. "0-50L", "50L-1Cr", "1Cr-2Cr")
    #[arg(long)]
    pub budget: Option<String>,
    /// Number of bedrooms
    #[arg(long)]
    pub bedrooms: Option<String>,
}

/// Query listings directly, bypassing the assistant.
pub async fn run(conn: Connection, args: SearchArgs) -> i32 {
    let filters = QuickFilters::new(args.location, args.budget, args.bedrooms);
    match conn.gateway.search_properties(&filters).await {
        Ok(properties) => print_json(&json!({
            "filters": filters.normalized(),
            "count": properties.len(),
            "properties": properties,
        })),
        Err(e) => report_gateway_error(&e),
    }
}

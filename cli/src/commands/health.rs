use crate::util::{Connection, print_json, report_gateway_error};

pub async fn run(conn: Connection) -> i32 {
    match conn.gateway.health().await {
        Ok(body) => print_json(&body),
        Err(e) => report_gateway_error(&e),
    }
}

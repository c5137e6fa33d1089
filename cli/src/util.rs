use mira_core::error::{GatewayError, codes};
use mira_core::{ClientConfig, ConfigError, SessionContext};
use serde::Serialize;
use serde_json::json;

use crate::gateway::HttpGateway;

/// Exit codes: 0=success, 1=client error (4xx) or failed action,
///             2=server error (5xx / undecodable reply), 3=connection error,
///             4=usage error
pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_SERVER: i32 = 2;
pub const EXIT_CONNECTION: i32 = 3;
pub const EXIT_USAGE: i32 = 4;

pub fn error_body(code: &str, message: &str, docs_hint: Option<&str>) -> serde_json::Value {
    let mut err = json!({
        "error": code,
        "message": message
    });
    if let Some(hint) = docs_hint {
        err["docs_hint"] = json!(hint);
    }
    err
}

pub fn exit_error(message: &str, docs_hint: Option<&str>) -> ! {
    eprintln!(
        "{}",
        to_pretty(&error_body(codes::CLI_ERROR, message, docs_hint))
    );
    std::process::exit(EXIT_USAGE);
}

pub fn exit_config_error(err: &ConfigError) -> ! {
    eprintln!(
        "{}",
        to_pretty(&error_body(
            codes::CONFIG_ERROR,
            &err.to_string(),
            Some("Check --api-url / MIRA_API_URL, --timeout-secs and --user-id."),
        ))
    );
    std::process::exit(EXIT_USAGE);
}

/// Print a gateway failure as structured JSON on stderr and pick the exit code.
pub fn report_gateway_error(err: &GatewayError) -> i32 {
    let (hint, exit_code) = match err {
        GatewayError::Transport(_) => (
            Some("Is the backend running? Check MIRA_API_URL."),
            EXIT_CONNECTION,
        ),
        GatewayError::Status { status, .. } if (400..500).contains(status) => (None, EXIT_FAILED),
        GatewayError::Status { .. } | GatewayError::Decode(_) => (None, EXIT_SERVER),
    };
    eprintln!(
        "{}",
        to_pretty(&error_body(err.code(), &err.to_string(), hint))
    );
    exit_code
}

pub fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{text}");
            EXIT_OK
        }
        Err(e) => {
            eprintln!(
                "{}",
                to_pretty(&error_body(codes::CLI_ERROR, &e.to_string(), None))
            );
            EXIT_FAILED
        }
    }
}

fn to_pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Validated connection settings shared by every subcommand.
pub struct Connection {
    pub gateway: HttpGateway,
    pub context: SessionContext,
}

pub fn connect(api_url: &str, timeout_secs: u64, user_id: &str) -> Connection {
    let config =
        ClientConfig::new(api_url, timeout_secs).unwrap_or_else(|e| exit_config_error(&e));
    let context = SessionContext::new(user_id).unwrap_or_else(|e| exit_config_error(&e));
    let gateway = HttpGateway::new(config).unwrap_or_else(|e| {
        std::process::exit(report_gateway_error(&e));
    });
    tracing::debug!(api_url, user_id = context.user_id(), "backend connection configured");
    Connection { gateway, context }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_includes_hint_only_when_given() {
        let plain = error_body("cli_error", "bad input", None);
        assert_eq!(plain["error"], "cli_error");
        assert!(plain.get("docs_hint").is_none());

        let hinted = error_body("connection_error", "refused", Some("start the backend"));
        assert_eq!(hinted["docs_hint"], "start the backend");
    }

    #[test]
    fn gateway_errors_map_to_exit_codes() {
        let status = |status| GatewayError::Status {
            status,
            body: String::new(),
        };
        assert_eq!(report_gateway_error(&status(404)), EXIT_FAILED);
        assert_eq!(report_gateway_error(&status(502)), EXIT_SERVER);
        assert_eq!(
            report_gateway_error(&GatewayError::Decode("eof".into())),
            EXIT_SERVER
        );
        assert_eq!(
            report_gateway_error(&GatewayError::Transport("refused".into())),
            EXIT_CONNECTION
        );
    }
}

/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin, one per line
/// 2. Processes tool calls using the habit tracker
/// 3. Sends JSON-RPC responses to stdout

use chrono::{Local, NaiveDate};
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{self, ToolError};
use crate::{HabitTrackerServer, ServerError};

/// MCP server that handles communication with a client
pub struct McpServer {
    /// The underlying habit tracker server
    habit_tracker: HabitTrackerServer,
    /// Whether the client has confirmed initialization
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(habit_tracker: HabitTrackerServer) -> Self {
        Self {
            habit_tracker,
            initialized: false,
        }
    }

    /// Whether the client sent its `initialized` notification
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.handle_line(&line, Local::now().date_naive()) {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// `today` is the reference date for every streak computed while
    /// handling the line. Returns `None` for blank lines and notifications.
    pub fn handle_line(&mut self, line: &str, today: NaiveDate) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        self.handle_request(request, today)
    }

    /// Handle a JSON-RPC request or notification
    fn handle_request(&mut self, request: JsonRpcRequest, today: NaiveDate) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            self.handle_notification(&request.method);
            return None;
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported JSON-RPC version '{}'", request.jsonrpc),
                None,
            ));
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params, today),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        };
        Some(response)
    }

    fn handle_notification(&mut self, method: &str) {
        match method {
            "notifications/initialized" | "initialized" => {
                self.initialized = true;
                info!("MCP client finished initialization");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        match params.map(serde_json::from_value::<InitializeParams>).transpose() {
            Ok(Some(init)) => {
                let client = init.client_info.as_ref();
                info!(
                    "MCP client connected: {} {} (protocol {})",
                    client.map_or("unknown", |c| c.name.as_str()),
                    client.and_then(|c| c.version.as_deref()).unwrap_or(""),
                    init.protocol_version
                );
            }
            Ok(None) => info!("MCP client connected"),
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid initialize parameters: {}", e),
                    None,
                );
            }
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        to_response(id, &result)
    }

    /// Handle tools/call request
    fn handle_tools_call(&self, id: Value, params: Option<Value>, today: NaiveDate) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params.map(serde_json::from_value).transpose() {
            Ok(Some(p)) => p,
            Ok(None) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
        };

        debug!("Calling tool {}", tool_params.name);
        match self.call_tool(&tool_params.name, tool_params.arguments, today) {
            Ok(result) => to_response(id, &result),
            Err(message) => JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, message, None),
        }
    }

    /// Dispatch a tool call; `Err` is a protocol-level problem with the call itself
    fn call_tool(&self, name: &str, args: Map<String, Value>, today: NaiveDate) -> Result<ToolCallResult, String> {
        let storage = self.habit_tracker.storage();
        let engine = self.habit_tracker.engine();

        let result = match name {
            "habit_create" => tool_result(tools::create_habit(storage, parse_args(args)?)),
            "habit_complete" => tool_result(tools::complete_habit(storage, engine, parse_args(args)?, today)),
            "habit_uncomplete" => tool_result(tools::uncomplete_habit(storage, engine, parse_args(args)?, today)),
            "habit_edit" => tool_result(tools::edit_habit(storage, engine, parse_args(args)?, today)),
            "habit_delete" => tool_result(tools::delete_habit(storage, parse_args(args)?)),
            "habit_status" => tool_result(tools::get_habit_status(storage, engine, parse_args(args)?, today)),
            "habit_report" => tool_result(tools::get_habit_report(storage, engine, parse_args(args)?)),
            _ => return Err(format!("Unknown tool: {}", name)),
        };
        Ok(result)
    }
}

/// Describe every tool with a schema generated from its params type
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        definition::<tools::CreateHabitParams>(
            "habit_create",
            "Create a new daily, weekly or monthly habit to track",
        ),
        definition::<tools::CompleteHabitParams>(
            "habit_complete",
            "Mark a habit as done for today or a past date and refresh its streak",
        ),
        definition::<tools::UncompleteHabitParams>(
            "habit_uncomplete",
            "Retract the completion of a habit for today or a past date",
        ),
        definition::<tools::EditHabitParams>(
            "habit_edit",
            "Rename a habit or change its cadence or status (active, paused, inactive)",
        ),
        definition::<tools::DeleteHabitParams>(
            "habit_delete",
            "Delete a habit together with its completion history",
        ),
        definition::<tools::StatusParams>(
            "habit_status",
            "Check current and best streaks for one habit or a filtered, sorted list",
        ),
        definition::<tools::ReportParams>(
            "habit_report",
            "Report habits by cadence, longest streaks, status breakdown and completion counts",
        ),
    ]
}

fn definition<P: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let input_schema = serde_json::to_value(schema_for!(P))
        .unwrap_or_else(|_| json!({ "type": "object" }));
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

fn parse_args<P: DeserializeOwned>(args: Map<String, Value>) -> Result<P, String> {
    serde_json::from_value(Value::Object(args)).map_err(|e| format!("Invalid arguments: {}", e))
}

/// Turn a tool's outcome into an MCP tool result
///
/// The response's `message` becomes the text content and the whole response
/// the structured content.
fn tool_result<R: Serialize>(result: Result<R, ToolError>) -> ToolCallResult {
    match result {
        Ok(response) => match serde_json::to_value(&response) {
            Ok(value) => {
                let text = value
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                ToolCallResult::success(text, Some(value))
            }
            Err(e) => ToolCallResult::error(error_codes::INTERNAL_ERROR, e.to_string()),
        },
        Err(e) => {
            warn!("Tool call failed: {}", e);
            ToolCallResult::error(tool_error_code(&e), e.to_string())
        }
    }
}

fn to_response<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
    }
}

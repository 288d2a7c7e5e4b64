/// MCP session tests: JSON-RPC lines in, responses out
use chrono::NaiveDate;
use habit_streaks::mcp::protocol::error_codes;
use habit_streaks::mcp::McpServer;
use habit_streaks::*;
use serde_json::{json, Value};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
}

fn server() -> McpServer {
    let storage = SqliteStorage::open_in_memory().expect("Failed to open storage");
    McpServer::new(HabitTrackerServer::with_storage(storage, StreakEngine::default()))
}

fn send(server: &mut McpServer, request: Value) -> Value {
    let response = server
        .handle_line(&request.to_string(), today())
        .expect("Expected a response");
    serde_json::to_value(response).unwrap()
}

fn call_tool(server: &mut McpServer, name: &str, arguments: Value) -> Value {
    send(
        server,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        }),
    )
}

#[cfg(test)]
mod mcp_session_tests {
    use super::*;

    #[test]
    fn test_initialize_handshake() {
        let mut server = server();

        let response = send(
            &mut server,
            json!({
                "jsonrpc": "2.0",
                "id": 0,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "test-client", "version": "1.0" }
                }
            }),
        );
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(response["result"]["capabilities"]["tools"]["listChanged"], false);

        // The initialized notification gets no response
        let notification = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
        assert!(server.handle_line(&notification.to_string(), today()).is_none());
        assert!(server.is_initialized());
    }

    #[test]
    fn test_tools_list_has_generated_schemas() {
        let mut server = server();

        let response = send(&mut server, json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }));
        let tools = response["result"]["tools"].as_array().unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(
            names,
            vec![
                "habit_create",
                "habit_complete",
                "habit_uncomplete",
                "habit_edit",
                "habit_delete",
                "habit_status",
                "habit_report",
            ]
        );

        let create_schema = &tools[0]["inputSchema"];
        assert!(create_schema["properties"]["cadence"].is_object());
        let required: Vec<&str> = create_schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert!(required.contains(&"name"));
        assert!(required.contains(&"cadence"));
    }

    #[test]
    fn test_complete_flow_over_json_rpc() {
        let mut server = server();

        let created = call_tool(&mut server, "habit_create", json!({ "name": "Read", "cadence": "daily" }));
        assert_eq!(created["result"]["isError"], false);
        let habit_id = created["result"]["structuredContent"]["habit_id"].as_str().unwrap().to_string();

        for date in ["2025-03-10", "2025-03-11"] {
            call_tool(&mut server, "habit_complete", json!({ "habit_id": habit_id, "date": date }));
        }
        let completed = call_tool(&mut server, "habit_complete", json!({ "habit_id": habit_id }));
        let result = &completed["result"];
        assert_eq!(result["isError"], false);
        assert_eq!(result["structuredContent"]["streak"]["current_streak"], 3);
        assert!(result["content"][0]["text"].as_str().unwrap().contains("3 days"));
    }

    #[test]
    fn test_tool_errors_are_tool_results() {
        let mut server = server();

        let bad_cadence = call_tool(&mut server, "habit_create", json!({ "name": "Read", "cadence": "hourly" }));
        assert_eq!(bad_cadence["result"]["isError"], true);
        assert_eq!(bad_cadence["result"]["structuredContent"]["code"], error_codes::VALIDATION_ERROR);

        let missing = call_tool(
            &mut server,
            "habit_complete",
            json!({ "habit_id": HabitId::new().to_string() }),
        );
        assert_eq!(missing["result"]["isError"], true);
        assert_eq!(missing["result"]["structuredContent"]["code"], error_codes::HABIT_NOT_FOUND);
    }

    #[test]
    fn test_protocol_errors() {
        let mut server = server();

        let garbage = server.handle_line("{not json", today()).unwrap();
        assert_eq!(garbage.error.unwrap().code, error_codes::PARSE_ERROR);

        let unknown_method = send(&mut server, json!({ "jsonrpc": "2.0", "id": 3, "method": "resources/list" }));
        assert_eq!(unknown_method["error"]["code"], error_codes::METHOD_NOT_FOUND);

        let unknown_tool = call_tool(&mut server, "habit_explode", json!({}));
        assert_eq!(unknown_tool["error"]["code"], error_codes::INVALID_PARAMS);

        let missing_args = call_tool(&mut server, "habit_create", json!({ "name": "Read" }));
        assert_eq!(missing_args["error"]["code"], error_codes::INVALID_PARAMS);

        assert!(server.handle_line("   ", today()).is_none());
    }
}

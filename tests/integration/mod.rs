/// Integration tests: tools and the MCP server over a real database
mod basic_integration;
mod mcp_session;

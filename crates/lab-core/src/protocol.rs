//! External Tool-Protocol Collaborator
//!
//! Level 8 integrates an external process-based tool provider (MCP-style).
//! The core only needs it to supply additional tool schemas; transport and
//! process lifecycle live behind [`ToolProtocolClient`] and are out of scope
//! here. Connection failures are recovered at this boundary and reported as
//! a boolean, so the lab proceeds with whatever tools are available.

use async_trait::async_trait;

use crate::error::Result;
use crate::tool::ToolSchema;

/// Transport-agnostic client for an external tool server
#[async_trait]
pub trait ToolProtocolClient: Send + Sync {
    /// Spawn/attach to the server and return the advertised tool names.
    async fn connect(&mut self, command: &str, args: &[String]) -> Result<Vec<String>>;

    /// List the full schemas of the server's tools.
    async fn list_tools(&self) -> Result<Vec<ToolSchema>>;

    /// Tear down the connection.
    async fn disconnect(&mut self) -> Result<()>;
}

/// Client used when no tool-server transport is wired in.
///
/// `connect` always fails, which the session boundary recovers into a
/// disconnected state; real transports implement [`ToolProtocolClient`]
/// and replace this at construction.
#[derive(Default)]
pub struct NullProtocolClient;

#[async_trait]
impl ToolProtocolClient for NullProtocolClient {
    async fn connect(&mut self, _command: &str, _args: &[String]) -> Result<Vec<String>> {
        Err(crate::error::LabError::Protocol(
            "no tool-server transport configured".into(),
        ))
    }

    async fn list_tools(&self) -> Result<Vec<ToolSchema>> {
        Ok(Vec::new())
    }

    async fn disconnect(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Tracks one connection to an external tool server
pub struct ToolProtocolSession {
    client: Box<dyn ToolProtocolClient>,
    connected: bool,
    server_name: Option<String>,
    available_tools: Vec<String>,
}

impl ToolProtocolSession {
    pub fn new(client: Box<dyn ToolProtocolClient>) -> Self {
        Self {
            client,
            connected: false,
            server_name: None,
            available_tools: Vec::new(),
        }
    }

    /// Connect to the server. Errors are logged and reported as `false`
    /// rather than raised; the caller decides whether to proceed without
    /// external tools.
    pub async fn connect(&mut self, command: &str, args: &[String]) -> bool {
        tracing::info!(command, ?args, "Connecting to tool server");

        match self.client.connect(command, args).await {
            Ok(tool_names) => {
                tracing::info!(tools = ?tool_names, "Tool server connected");
                self.server_name = Some(format!("{} {}", command, args.join(" ")));
                self.available_tools = tool_names;
                self.connected = true;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to tool server");
                self.connected = false;
                false
            }
        }
    }

    /// Schemas of the connected server's tools; empty when disconnected.
    pub async fn list_tools(&self) -> Vec<ToolSchema> {
        if !self.connected {
            return Vec::new();
        }

        match self.client.list_tools().await {
            Ok(schemas) => schemas,
            Err(e) => {
                tracing::warn!(error = %e, "Listing tool server tools failed");
                Vec::new()
            }
        }
    }

    /// Disconnect and clear session state.
    pub async fn disconnect(&mut self) {
        if let Err(e) = self.client.disconnect().await {
            tracing::warn!(error = %e, "Tool server disconnect failed");
        }
        self.connected = false;
        self.server_name = None;
        self.available_tools.clear();
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    pub fn available_tools(&self) -> &[String] {
        &self.available_tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LabError;
    use crate::tool::ParameterSpec;

    struct FakeClient {
        fail_connect: bool,
    }

    #[async_trait]
    impl ToolProtocolClient for FakeClient {
        async fn connect(&mut self, _command: &str, _args: &[String]) -> Result<Vec<String>> {
            if self.fail_connect {
                Err(LabError::Protocol("spawn failed".into()))
            } else {
                Ok(vec!["read_file".into(), "list_directory".into()])
            }
        }

        async fn list_tools(&self) -> Result<Vec<ToolSchema>> {
            Ok(vec![ToolSchema {
                name: "read_file".into(),
                description: "Read a file".into(),
                parameters: vec![ParameterSpec::required("path", "string", "File path")],
            }])
        }

        async fn disconnect(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_successful_connect() {
        let mut session = ToolProtocolSession::new(Box::new(FakeClient { fail_connect: false }));

        assert!(session.connect("fs-server", &["/tmp".into()]).await);
        assert!(session.is_connected());
        assert_eq!(session.available_tools().len(), 2);
        assert_eq!(session.server_name(), Some("fs-server /tmp"));
        assert_eq!(session.list_tools().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_connect_is_reported_not_raised() {
        let mut session = ToolProtocolSession::new(Box::new(FakeClient { fail_connect: true }));

        assert!(!session.connect("fs-server", &[]).await);
        assert!(!session.is_connected());
        assert!(session.list_tools().await.is_empty());
    }

    #[tokio::test]
    async fn test_null_client_session_stays_disconnected() {
        let mut session = ToolProtocolSession::new(Box::new(NullProtocolClient));

        assert!(!session.connect("fs-server", &[]).await);
        assert!(!session.is_connected());
        assert!(session.server_name().is_none());
        assert!(session.available_tools().is_empty());
        assert!(session.list_tools().await.is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_clears_state() {
        let mut session = ToolProtocolSession::new(Box::new(FakeClient { fail_connect: false }));
        session.connect("fs-server", &[]).await;

        session.disconnect().await;

        assert!(!session.is_connected());
        assert!(session.server_name().is_none());
        assert!(session.available_tools().is_empty());
    }
}

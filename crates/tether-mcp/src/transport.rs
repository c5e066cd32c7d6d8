//! Stdio transport: newline-delimited JSON-RPC over a child process.
//!
//! The session model is strictly sequential — one outstanding request at a
//! time — so the transport writes a line and then reads until the matching
//! reply arrives. There is no request timeout: a hung server stalls the
//! caller.

use crate::config::ServerConfig;
use crate::error::McpError;
use crate::rpc::{Notification, Request, Response};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

/// A spawned server process with piped stdin/stdout.
pub struct StdioTransport {
    child: Child,
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
    next_id: u64,
}

impl StdioTransport {
    /// Spawn the server process. Stderr is discarded.
    pub fn spawn(name: &str, config: &ServerConfig) -> Result<Self, McpError> {
        let mut child = Command::new(&config.command)
            .args(&config.args)
            .envs(&config.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| McpError::Spawn {
                name: name.to_string(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| McpError::Protocol("child stdin was not piped".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| McpError::Protocol("child stdout was not piped".into()))?;

        Ok(Self {
            child,
            stdin,
            lines: BufReader::new(stdout).lines(),
            next_id: 1,
        })
    }

    /// Send a request and wait for its reply.
    ///
    /// Server notifications, replies to stale ids, and non-JSON lines some
    /// servers print on startup are skipped while waiting.
    pub async fn request(
        &mut self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<Response, McpError> {
        let id = self.next_id;
        self.next_id += 1;

        let mut request = Request::new(id, method);
        if let Some(params) = params {
            request = request.with_params(params);
        }
        self.write_line(&serde_json::to_string(&request)?).await?;

        loop {
            let line = match self.lines.next_line().await? {
                Some(line) => line,
                None => return Err(McpError::Closed),
            };
            if line.trim().is_empty() {
                continue;
            }
            let response: Response = match serde_json::from_str(&line) {
                Ok(response) => response,
                Err(e) => {
                    tracing::debug!("skipping unparseable server line: {e}");
                    continue;
                }
            };
            match response.id {
                Some(got) if got == id => return Ok(response),
                _ => continue,
            }
        }
    }

    /// Send a notification; nothing comes back.
    pub async fn notify(
        &mut self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<(), McpError> {
        let mut notification = Notification::new(method);
        if let Some(params) = params {
            notification = notification.with_params(params);
        }
        self.write_line(&serde_json::to_string(&notification)?).await
    }

    async fn write_line(&mut self, line: &str) -> Result<(), McpError> {
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Close stdin (EOF), give the child a grace period to exit, then kill.
    pub async fn shutdown(self) {
        let Self {
            mut child, stdin, ..
        } = self;
        drop(stdin);

        let grace =
            tokio::time::timeout(std::time::Duration::from_secs(5), child.wait()).await;
        if grace.is_err() {
            if let Err(e) = child.kill().await {
                tracing::warn!("failed to kill server process: {e}");
            }
        }
    }
}

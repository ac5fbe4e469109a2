mod cli;

pub use cli::*;
use claim_assembler::ClaimPayload;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub socket: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            socket: Self::DEFAULT_SOCKET.into(),
        }
    }
}

impl App {
    pub const DEFAULT_SOCKET: &str = "127.0.0.1:3000";

    pub fn with_socket<V: AsRef<str>>(mut self, socket: V) -> Self {
        self.socket = socket.as_ref().into();
        self
    }

    /// Requests the claim payload of the deposit carrying `data`.
    ///
    /// Returns the service response, successful or not. A body that isn't JSON is returned as
    /// text.
    pub fn claim<D, S>(&self, data: D, sender: Option<S>) -> anyhow::Result<Value>
    where
        D: AsRef<str>,
        S: AsRef<str>,
    {
        let uri = format!("http://{}/", self.socket);
        let sender: Option<&str> = sender.as_ref().map(|s| s.as_ref());

        let response = reqwest::blocking::Client::new()
            .post(uri)
            .json(&json!({
                "data": data.as_ref(),
                "sender": sender,
            }))
            .send()?;

        let status = response.status();
        let body = response.text()?;

        Ok(Self::response(status.as_u16(), &body))
    }

    fn response(status: u16, body: &str) -> Value {
        let body = serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.into()));

        json!({
            "status": status,
            "response": body,
        })
    }

    /// Decodes a hex claim payload.
    pub fn decode<P: AsRef<str>>(payload: P) -> anyhow::Result<Value> {
        let bytes = const_hex::decode(payload.as_ref().trim())?;
        let payload = ClaimPayload::decode(bytes)?;

        Ok(json!({
            "smtProofLocalExitRoot": payload.smtProofLocalExitRoot,
            "smtProofRollupExitRoot": payload.smtProofRollupExitRoot,
            "globalIndex": payload.globalIndex.to_string(),
            "mainnetExitRoot": payload.mainnetExitRoot,
            "rollupExitRoot": payload.rollupExitRoot,
            "originNetwork": payload.originNetwork,
            "originAddress": payload.originAddress,
            "destinationNetwork": payload.destinationNetwork,
            "destinationAddress": payload.destinationAddress,
            "amount": payload.amount.to_string(),
            "metadata": payload.metadata,
        }))
    }
}

use thiserror::Error;

use crate::config::Precision;

/// Text and voice for one generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: String,
}

/// Controller → worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeRequest {
    Init { model_id: String, precision: Precision },
    Synthesize(SynthesisRequest),
}

/// Worker → controller. Every request gets exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeReply {
    InitReady,
    SynthesisReady { audio: Vec<u8> },
    Error(BridgeError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("{0}")]
    Initialization(String),
    #[error("TTS not initialized")]
    NotInitialized,
    #[error("{0}")]
    Synthesis(String),
    #[error("TTS worker panicked: {0}")]
    WorkerPanicked(String),
}

impl From<BridgeError> for BridgeReply {
    fn from(err: BridgeError) -> Self {
        BridgeReply::Error(err)
    }
}

impl BridgeReply {
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeReply::InitReady => "init-ready",
            BridgeReply::SynthesisReady { .. } => "synthesis-ready",
            BridgeReply::Error(_) => "error",
        }
    }
}

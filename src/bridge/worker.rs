use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{Receiver, Sender};

use super::messages::{BridgeError, BridgeReply, BridgeRequest, SynthesisRequest};
use crate::config::Precision;
use crate::engine::{ModelProvider, SpeechEngine};

/// The loaded model, if any. Only the worker ever touches it.
pub enum EngineState {
    Uninitialized,
    Ready(Box<dyn SpeechEngine>),
}

/// Owns the provider and the engine; handles one request at a time.
pub struct SynthesisWorker {
    provider: Box<dyn ModelProvider>,
    state: EngineState,
}

impl SynthesisWorker {
    pub fn new(provider: Box<dyn ModelProvider>) -> Self {
        Self {
            provider,
            state: EngineState::Uninitialized,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, EngineState::Ready(_))
    }

    /// Process one request. Never panics; every failure becomes an error reply.
    pub fn handle(&mut self, request: BridgeRequest) -> BridgeReply {
        match request {
            BridgeRequest::Init {
                model_id,
                precision,
            } => self.init(&model_id, precision),
            BridgeRequest::Synthesize(req) => self.synthesize(req),
        }
    }

    fn init(&mut self, model_id: &str, precision: Precision) -> BridgeReply {
        let provider = &mut self.provider;
        match catch_unwind(AssertUnwindSafe(|| provider.load(model_id, precision))) {
            Ok(Ok(engine)) => {
                log::info!("Model {} ({}) ready", model_id, precision);
                self.state = EngineState::Ready(engine);
                BridgeReply::InitReady
            }
            Ok(Err(e)) => BridgeError::Initialization(format!("{:#}", e)).into(),
            Err(payload) => BridgeError::WorkerPanicked(panic_message(payload)).into(),
        }
    }

    fn synthesize(&mut self, req: SynthesisRequest) -> BridgeReply {
        let engine = match &mut self.state {
            EngineState::Uninitialized => return BridgeError::NotInitialized.into(),
            EngineState::Ready(engine) => engine,
        };

        match catch_unwind(AssertUnwindSafe(|| engine.synthesize(&req.text, &req.voice))) {
            Ok(Ok(audio)) => BridgeReply::SynthesisReady { audio },
            Ok(Err(e)) => BridgeError::Synthesis(format!("{:#}", e)).into(),
            Err(payload) => BridgeError::WorkerPanicked(panic_message(payload)).into(),
        }
    }

    /// Serve requests until the controller hangs up.
    pub fn run(mut self, requests: Receiver<BridgeRequest>, replies: Sender<BridgeReply>) {
        while let Ok(request) = requests.recv() {
            let reply = self.handle(request);
            if let BridgeReply::Error(ref e) = reply {
                log::debug!("Worker replying with error: {}", e);
            }
            if replies.send(reply).is_err() {
                break;
            }
        }
        log::debug!("TTS worker exiting");
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

//! Synthesis worker bridge
//!
//! Model loading and inference run on a dedicated thread. The controller
//! talks to it only through two channels: requests go in, exactly one reply
//! comes back per request, in arrival order.

pub mod messages;
pub mod worker;

use anyhow::{anyhow, Result};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use crate::config::Precision;
use crate::engine::ModelProvider;

pub use messages::{BridgeError, BridgeReply, BridgeRequest, SynthesisRequest};
pub use worker::{EngineState, SynthesisWorker};

/// Controller side of the worker connection.
pub struct SynthesisBridge {
    requests: Sender<BridgeRequest>,
    replies: Receiver<BridgeReply>,
}

impl SynthesisBridge {
    /// Start the worker thread with `provider` moved into it.
    pub fn spawn(provider: Box<dyn ModelProvider>) -> Result<Self> {
        let (req_tx, req_rx) = mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::channel();

        std::thread::Builder::new()
            .name("tts-worker".to_string())
            .spawn(move || {
                SynthesisWorker::new(provider).run(req_rx, reply_tx);
            })?;

        Ok(Self {
            requests: req_tx,
            replies: reply_rx,
        })
    }

    pub fn init(&self, model_id: &str, precision: Precision) -> Result<()> {
        self.send(BridgeRequest::Init {
            model_id: model_id.to_string(),
            precision,
        })
    }

    pub fn synthesize(&self, text: &str, voice: &str) -> Result<()> {
        self.send(BridgeRequest::Synthesize(SynthesisRequest {
            text: text.to_string(),
            voice: voice.to_string(),
        }))
    }

    fn send(&self, request: BridgeRequest) -> Result<()> {
        self.requests
            .send(request)
            .map_err(|_| anyhow!("TTS worker is not running"))
    }

    /// Next reply if one is already waiting.
    pub fn try_recv(&self) -> Option<BridgeReply> {
        match self.replies.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<BridgeReply> {
        match self.replies.recv_timeout(timeout) {
            Ok(reply) => Some(reply),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Hang up. The worker finishes whatever it is doing and exits; its reply is dropped.
    pub fn terminate(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SpeechEngine;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct SlowEngine;

    impl SpeechEngine for SlowEngine {
        fn synthesize(&mut self, text: &str, _voice: &str) -> Result<Vec<u8>> {
            std::thread::sleep(Duration::from_millis(50));
            Ok(text.as_bytes().to_vec())
        }
    }

    struct SlowProvider {
        dropped: Arc<AtomicBool>,
    }

    impl Drop for SlowProvider {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::SeqCst);
        }
    }

    impl ModelProvider for SlowProvider {
        fn load(&mut self, _model_id: &str, _precision: Precision) -> Result<Box<dyn SpeechEngine>> {
            Ok(Box::new(SlowEngine))
        }
    }

    fn bridge() -> (SynthesisBridge, Arc<AtomicBool>) {
        let dropped = Arc::new(AtomicBool::new(false));
        let provider = SlowProvider {
            dropped: dropped.clone(),
        };
        (SynthesisBridge::spawn(Box::new(provider)).unwrap(), dropped)
    }

    #[test]
    fn one_reply_per_request() {
        let (bridge, _) = bridge();
        bridge.init("m1", Precision::Q8).unwrap();
        bridge.synthesize("Hello world", "af").unwrap();

        let timeout = Duration::from_secs(5);
        assert_eq!(bridge.recv_timeout(timeout), Some(BridgeReply::InitReady));
        assert_eq!(
            bridge.recv_timeout(timeout),
            Some(BridgeReply::SynthesisReady {
                audio: b"Hello world".to_vec()
            })
        );
        assert_eq!(bridge.recv_timeout(Duration::from_millis(100)), None);
        assert_eq!(bridge.try_recv(), None);
    }

    #[test]
    fn terminate_releases_the_worker() {
        let (bridge, dropped) = bridge();
        bridge.init("m1", Precision::Q8).unwrap();
        bridge.synthesize("abandoned", "af").unwrap();
        bridge.terminate();

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while !dropped.load(Ordering::SeqCst) && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(dropped.load(Ordering::SeqCst));
    }
}

//! Application controller: owns UI state and the bridge connection.

use anyhow::Result;
use std::time::Duration;
use thiserror::Error;

use crate::audio::AudioSink;
use crate::bridge::{BridgeReply, SynthesisBridge};
use crate::config::Precision;
use crate::engine::ModelProvider;

/// Everything the form renders
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiState {
    /// Between init request and its reply
    pub is_loading: bool,
    /// Between synthesize request and its reply
    pub is_generating: bool,
    /// Some init has succeeded on the current connection
    pub model_ready: bool,
    pub text: String,
    pub voice: String,
    pub last_error: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("text is empty")]
    EmptyText,
    #[error("model is still loading")]
    Loading,
    #[error("a generation is already running")]
    Busy,
    #[error("controller is stopped")]
    Stopped,
    #[error("{0}")]
    Disconnected(String),
}

pub struct AppController {
    state: UiState,
    bridge: Option<SynthesisBridge>,
    sink: Box<dyn AudioSink>,
}

impl AppController {
    pub fn new(sink: Box<dyn AudioSink>, text: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            state: UiState {
                text: text.into(),
                voice: voice.into(),
                ..Default::default()
            },
            bridge: None,
            sink,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn text_mut(&mut self) -> &mut String {
        &mut self.state.text
    }

    pub fn voice_mut(&mut self) -> &mut String {
        &mut self.state.voice
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_loading || self.state.is_generating
    }

    pub fn is_running(&self) -> bool {
        self.bridge.is_some()
    }

    /// Spawn the worker and ask it to load the model.
    pub fn start(
        &mut self,
        provider: Box<dyn ModelProvider>,
        model_id: &str,
        precision: Precision,
    ) -> Result<()> {
        if let Err(e) = self.connect(provider) {
            self.fail(format!("{:#}", e));
            return Err(e);
        }
        self.send_init(model_id, precision);
        Ok(())
    }

    /// Spawn the worker without loading anything. Replaces a previous connection.
    pub fn connect(&mut self, provider: Box<dyn ModelProvider>) -> Result<()> {
        self.stop();
        self.bridge = Some(SynthesisBridge::spawn(provider)?);
        self.state.is_loading = false;
        self.state.is_generating = false;
        self.state.model_ready = false;
        Ok(())
    }

    /// Ask the running worker to load a model again, e.g. after a failed start.
    pub fn reload(&mut self, model_id: &str, precision: Precision) -> Result<(), SubmitError> {
        if self.bridge.is_none() {
            return Err(SubmitError::Stopped);
        }
        self.check_idle()?;
        self.send_init(model_id, precision);
        Ok(())
    }

    fn send_init(&mut self, model_id: &str, precision: Precision) {
        let Some(bridge) = &self.bridge else {
            return;
        };
        log::info!("Requesting model {} ({})", model_id, precision);
        self.state.is_loading = true;
        if let Err(e) = bridge.init(model_id, precision) {
            self.fail(e.to_string());
        }
    }

    /// Submit the text and voice currently held in the state.
    pub fn submit_current(&mut self) -> Result<(), SubmitError> {
        let text = self.state.text.clone();
        let voice = self.state.voice.clone();
        self.submit(&text, &voice)
    }

    pub fn submit(&mut self, text: &str, voice: &str) -> Result<(), SubmitError> {
        if text.trim().is_empty() {
            return Err(SubmitError::EmptyText);
        }
        let Some(bridge) = &self.bridge else {
            return Err(SubmitError::Stopped);
        };
        self.check_idle()?;

        self.state.text = text.to_string();
        self.state.voice = voice.to_string();

        log::debug!("Submitting {} chars with voice {}", text.len(), voice);
        if let Err(e) = bridge.synthesize(text, voice) {
            let message = e.to_string();
            self.fail(message.clone());
            return Err(SubmitError::Disconnected(message));
        }
        self.state.is_generating = true;
        Ok(())
    }

    fn check_idle(&self) -> Result<(), SubmitError> {
        if self.state.is_loading {
            Err(SubmitError::Loading)
        } else if self.state.is_generating {
            Err(SubmitError::Busy)
        } else {
            Ok(())
        }
    }

    pub fn on_bridge_message(&mut self, reply: BridgeReply) {
        match reply {
            BridgeReply::InitReady => {
                log::info!("Model loaded");
                self.state.is_loading = false;
                self.state.model_ready = true;
                self.state.last_error = None;
            }
            BridgeReply::SynthesisReady { audio } => {
                log::info!("Generated {} bytes of audio", audio.len());
                if let Err(e) = self.sink.play(&audio) {
                    log::error!("Playback error: {:#}", e);
                    self.state.last_error = Some(format!("Playback failed: {}", e));
                } else {
                    self.state.last_error = None;
                }
                self.state.is_generating = false;
            }
            BridgeReply::Error(err) => self.fail(err.to_string()),
        }
    }

    /// Any error collapses back to an idle, retryable state
    fn fail(&mut self, message: String) {
        log::error!("Worker error: {}", message);
        self.state.is_loading = false;
        self.state.is_generating = false;
        self.state.last_error = Some(message);
    }

    /// Dispatch every reply that has already arrived. Returns how many were handled.
    pub fn poll(&mut self) -> usize {
        let mut handled = 0;
        while let Some(reply) = self.bridge.as_ref().and_then(|b| b.try_recv()) {
            self.on_bridge_message(reply);
            handled += 1;
        }
        handled
    }

    /// Block for at most `timeout` waiting for one reply.
    pub fn wait_reply(&mut self, timeout: Duration) -> bool {
        match self.bridge.as_ref().and_then(|b| b.recv_timeout(timeout)) {
            Some(reply) => {
                self.on_bridge_message(reply);
                true
            }
            None => false,
        }
    }

    /// Drop the worker connection. Pending work is abandoned without a callback.
    pub fn stop(&mut self) {
        if let Some(bridge) = self.bridge.take() {
            log::info!("Stopping TTS worker");
            bridge.terminate();
        }
    }
}

impl Drop for AppController {
    fn drop(&mut self) {
        self.stop();
    }
}

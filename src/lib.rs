//! Desktop text-to-speech front end for the Kokoro ONNX model.
//!
//! The UI thread owns an [`controller::AppController`]; model loading and
//! inference happen on a single worker thread behind [`bridge::SynthesisBridge`].

pub mod audio;
pub mod bridge;
pub mod config;
pub mod controller;
pub mod engine;
pub mod gui;

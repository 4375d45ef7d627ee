//! Speech output.
//!
//! - [`dispatch`]: de-duplication and cancel-before-speak policy
//! - [`sink`]: playback backends

pub mod dispatch;
pub mod sink;

pub use dispatch::{SpeechDispatcher, VoiceSettings};
pub use sink::{
    ConsoleSpeech, ProcessSpeech, RecordingSpeech, SpeechEvent, SpeechLog, SpeechSink, Utterance,
};

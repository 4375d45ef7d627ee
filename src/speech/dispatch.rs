//! Speech dispatch policy.
//!
//! Decides whether an instruction reaches the speech sink:
//! - repeated messages are dropped (textual de-duplication)
//! - nothing is spoken while speech is disabled
//! - every accepted utterance cancels the one in flight first

use super::sink::{SpeechSink, Utterance};
use crate::config::SpeechConfig;
use crate::guidance::NavigationInstruction;

/// Voice parameters applied to every utterance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceSettings {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            rate: 0.8,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

impl From<&SpeechConfig> for VoiceSettings {
    fn from(config: &SpeechConfig) -> Self {
        Self {
            rate: config.rate,
            pitch: config.pitch,
            volume: config.volume,
        }
    }
}

/// Forwards instructions to a speech sink.
#[derive(Debug)]
pub struct SpeechDispatcher {
    enabled: bool,
    voice: VoiceSettings,
}

impl Default for SpeechDispatcher {
    fn default() -> Self {
        Self::new(true, VoiceSettings::default())
    }
}

impl SpeechDispatcher {
    pub fn new(enabled: bool, voice: VoiceSettings) -> Self {
        Self { enabled, voice }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(config.enabled, VoiceSettings::from(config))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable speech. Disabling always stops the utterance in flight.
    pub fn set_enabled(&mut self, enabled: bool, sink: &mut dyn SpeechSink) {
        if self.enabled && !enabled {
            sink.cancel();
            tracing::info!("Speech disabled");
        } else if !self.enabled && enabled {
            tracing::info!("Speech enabled");
        }
        self.enabled = enabled;
    }

    /// Flip the enabled flag, returning the new value.
    pub fn toggle(&mut self, sink: &mut dyn SpeechSink) -> bool {
        let enabled = !self.enabled;
        self.set_enabled(enabled, sink);
        enabled
    }

    /// Speak `instruction` unless it repeats `previous_message` or speech is off.
    ///
    /// Returns true when the instruction was forwarded to the sink.
    pub fn maybe_speak(
        &self,
        instruction: &NavigationInstruction,
        previous_message: &str,
        sink: &mut dyn SpeechSink,
    ) -> bool {
        if instruction.message == previous_message {
            return false;
        }
        self.announce(&instruction.message, sink)
    }

    /// Speak an out-of-band phrase (destination set, warnings).
    pub fn announce(&self, text: &str, sink: &mut dyn SpeechSink) -> bool {
        if !self.enabled {
            tracing::debug!("Speech disabled, not speaking: {}", text);
            return false;
        }

        sink.cancel();
        let utterance = Utterance {
            text: text.to_string(),
            rate: self.voice.rate,
            pitch: self.voice.pitch,
            volume: self.voice.volume,
        };
        if let Err(e) = sink.speak(&utterance) {
            tracing::warn!("Speech sink failed: {}", e);
        }
        true
    }
}

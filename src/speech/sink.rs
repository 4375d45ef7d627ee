//! Speech sinks: where accepted utterances end up.

use std::cell::RefCell;
use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::rc::Rc;

use crate::config::SpeechConfig;
use crate::error::Result;

/// Text plus voice parameters for one utterance.
#[derive(Clone, Debug, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// Speaking rate multiplier (1.0 = normal)
    pub rate: f32,
    /// Pitch multiplier (1.0 = normal)
    pub pitch: f32,
    /// Volume, 0.0 to 1.0
    pub volume: f32,
}

/// Speech synthesis playback.
///
/// Implementations play at most what they were last asked to; the dispatch
/// policy cancels before every new utterance.
pub trait SpeechSink {
    /// Start speaking an utterance.
    fn speak(&mut self, utterance: &Utterance) -> Result<()>;

    /// Stop the utterance in flight, if any.
    fn cancel(&mut self);

    /// Whether an utterance is still playing.
    fn is_speaking(&mut self) -> bool;
}

/// Writes utterances as text lines, to stderr unless told otherwise.
///
/// Stdout is reserved for display output such as `--json` state lines.
pub struct ConsoleSpeech {
    out: Box<dyn Write>,
}

impl ConsoleSpeech {
    pub fn new(out: impl Write + 'static) -> Self {
        Self { out: Box::new(out) }
    }
}

impl Default for ConsoleSpeech {
    fn default() -> Self {
        Self::new(std::io::stderr())
    }
}

impl std::fmt::Debug for ConsoleSpeech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSpeech").finish_non_exhaustive()
    }
}

impl SpeechSink for ConsoleSpeech {
    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        writeln!(self.out, "[speech] {}", utterance.text)?;
        Ok(())
    }

    fn cancel(&mut self) {}

    fn is_speaking(&mut self) -> bool {
        false
    }
}

/// Drives an espeak-compatible command line synthesizer.
///
/// Each utterance runs as a child process; cancelling kills it.
#[derive(Debug)]
pub struct ProcessSpeech {
    program: String,
    voice: String,
    extra_args: Vec<String>,
    child: Option<Child>,
}

impl ProcessSpeech {
    pub fn new(config: &SpeechConfig, voice: &str) -> Self {
        Self {
            program: config.program.clone(),
            voice: voice.to_string(),
            extra_args: config.args.clone(),
            child: None,
        }
    }

    fn command(&self, utterance: &Utterance) -> Command {
        // espeak defaults: 175 words/min, pitch 50, amplitude 100
        let speed = (175.0 * utterance.rate).round() as u32;
        let pitch = (50.0 * utterance.pitch).clamp(0.0, 99.0).round() as u32;
        let amplitude = (100.0 * utterance.volume).clamp(0.0, 200.0).round() as u32;

        let mut cmd = Command::new(&self.program);
        cmd.arg("-v")
            .arg(&self.voice)
            .arg("-s")
            .arg(speed.to_string())
            .arg("-p")
            .arg(pitch.to_string())
            .arg("-a")
            .arg(amplitude.to_string())
            .args(&self.extra_args)
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

impl SpeechSink for ProcessSpeech {
    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        self.cancel();
        let child = self.command(utterance).spawn()?;
        tracing::debug!("Spawned {} (pid {})", self.program, child.id());
        self.child = Some(child);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take()
            && let Ok(None) = child.try_wait()
        {
            if let Err(e) = child.kill() {
                tracing::warn!("Failed to stop speech process: {}", e);
            }
            if let Err(e) = child.wait() {
                tracing::warn!("Failed to reap speech process: {}", e);
            }
        }
    }

    fn is_speaking(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }
}

impl Drop for ProcessSpeech {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Call observed by a [`RecordingSpeech`].
#[derive(Clone, Debug, PartialEq)]
pub enum SpeechEvent {
    Speak(String),
    Cancel,
}

/// Shared log of speech calls.
pub type SpeechLog = Rc<RefCell<Vec<SpeechEvent>>>;

/// Records calls instead of playing audio (dry runs, tests).
#[derive(Debug, Default)]
pub struct RecordingSpeech {
    log: SpeechLog,
    speaking: bool,
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the call log that stays valid after the sink is moved.
    pub fn log(&self) -> SpeechLog {
        Rc::clone(&self.log)
    }
}

impl SpeechSink for RecordingSpeech {
    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        self.log
            .borrow_mut()
            .push(SpeechEvent::Speak(utterance.text.clone()));
        self.speaking = true;
        Ok(())
    }

    fn cancel(&mut self) {
        self.log.borrow_mut().push(SpeechEvent::Cancel);
        self.speaking = false;
    }

    fn is_speaking(&mut self) -> bool {
        self.speaking
    }
}

//! Spoken message catalogue.

use serde::Deserialize;

/// Language used for spoken and displayed messages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "id")]
    Indonesian,
}

impl Language {
    /// espeak voice name for this language.
    pub fn voice(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Indonesian => "id",
        }
    }
}

/// Message texts for one language.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Phrasebook {
    language: Language,
}

impl Phrasebook {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn straight(&self, meters: u64) -> String {
        match self.language {
            Language::English => format!("go straight, {} meters to destination", meters),
            Language::Indonesian => format!("Lurus terus. Jarak {} meter ke tujuan.", meters),
        }
    }

    pub fn turn_right(&self, meters: u64) -> String {
        match self.language {
            Language::English => format!("turn right, {} meters to destination", meters),
            Language::Indonesian => format!("Belok kanan. Jarak {} meter ke tujuan.", meters),
        }
    }

    pub fn turn_left(&self, meters: u64) -> String {
        match self.language {
            Language::English => format!("turn left, {} meters to destination", meters),
            Language::Indonesian => format!("Belok kiri. Jarak {} meter ke tujuan.", meters),
        }
    }

    /// First time the stick enters the arrival radius.
    pub fn destination_reached(&self) -> String {
        match self.language {
            Language::English => "destination reached".to_string(),
            Language::Indonesian => {
                "Tujuan tercapai! Anda telah sampai di lokasi tujuan.".to_string()
            }
        }
    }

    /// Every later recomputation inside the arrival radius.
    pub fn at_destination(&self) -> String {
        match self.language {
            Language::English => "you are at the destination".to_string(),
            Language::Indonesian => "Anda sudah di tujuan".to_string(),
        }
    }

    pub fn destination_set(&self, label: &str) -> String {
        match self.language {
            Language::English => format!("destination set to {}, you may start walking", label),
            Language::Indonesian => format!(
                "Tujuan telah diatur ke {}. Silakan mulai perjalanan.",
                label
            ),
        }
    }

    pub fn warning(&self, text: &str) -> String {
        match self.language {
            Language::English => format!("warning: {}", text),
            Language::Indonesian => format!("Peringatan: {}", text),
        }
    }

    /// Spoken when the stick reports a coordinate outside the valid range.
    pub fn invalid_position(&self) -> String {
        match self.language {
            Language::English => "invalid position from the stick".to_string(),
            Language::Indonesian => "posisi tongkat tidak valid".to_string(),
        }
    }

    /// Spoken when the destination record holds a coordinate outside the valid range.
    pub fn invalid_destination(&self) -> String {
        match self.language {
            Language::English => {
                "invalid destination, please set the destination again".to_string()
            }
            Language::Indonesian => "tujuan tidak valid, silakan atur ulang tujuan".to_string(),
        }
    }

    pub fn status_awaiting_data(&self) -> &'static str {
        match self.language {
            Language::English => "awaiting data",
            Language::Indonesian => "Menunggu Data",
        }
    }

    pub fn status_in_transit(&self) -> &'static str {
        match self.language {
            Language::English => "in transit",
            Language::Indonesian => "Dalam Perjalanan",
        }
    }

    pub fn status_approaching(&self) -> &'static str {
        match self.language {
            Language::English => "approaching destination",
            Language::Indonesian => "Mendekati Tujuan",
        }
    }

    pub fn status_arrived(&self) -> &'static str {
        match self.language {
            Language::English => "arrived",
            Language::Indonesian => "Tiba di Tujuan",
        }
    }

    /// Unit word used in short distance text.
    pub fn meter_unit(&self) -> &'static str {
        match self.language {
            Language::English => "m",
            Language::Indonesian => "meter",
        }
    }
}

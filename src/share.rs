use crate::assessment::AssessmentResult;
use strum::Display;

pub const WHATSAPP_BASE: &str = "https://wa.me/?text=";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ShareTarget {
    #[strum(serialize = "whatsapp")]
    WhatsApp,
    #[strum(serialize = "copy-link")]
    CopyLink,
}

/// Text handed to an external share facility. Formatting only; nothing is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMessage {
    pub text: String,
    pub url: String,
}

impl ShareMessage {
    pub fn new(result: &AssessmentResult, base_url: &str, max_score: u32) -> Self {
        let url = base_url.trim().to_string();
        let text = format!(
            "*Hamilton Stress Test* \u{1F493}\n\n\
             Hola, acabo de realizar mi valoración de ansiedad y mi resultado es: *{}* ({}/{}).\n\n\
             ¿Quieres saber cómo estás tú? Haz el test gratuito aquí \u{1F447}\n{}",
            result.band_label, result.total_score, max_score, url
        );
        Self { text, url }
    }

    pub fn whatsapp_url(&self) -> String {
        format!("{}{}", WHATSAPP_BASE, urlencoding::encode(&self.text))
    }

    pub fn copy_text(&self) -> &str {
        &self.url
    }

    /// The string to hand to the OS facility for `target`.
    pub fn payload(&self, target: ShareTarget) -> String {
        match target {
            ShareTarget::WhatsApp => self.whatsapp_url(),
            ShareTarget::CopyLink => self.copy_text().to_string(),
        }
    }
}

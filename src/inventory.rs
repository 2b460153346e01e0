use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

/// Bumped whenever a question, a reverse flag, an option value or a band bound changes,
/// since any of those changes the score of every future session.
pub const INVENTORY_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
    pub is_reverse: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOption {
    pub value: u8,
    pub label: &'static str,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Normal,
    Mild,
    Moderate,
    Severe,
    ExtremelySevere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBand {
    pub upper_bound: u32,
    pub label: &'static str,
    pub severity: Severity,
    pub guidance: &'static [&'static str],
}

pub const QUESTIONS: &[Question] = &[
    Question { id: 1, text: "Me siento más nervioso y ansioso de lo normal.", is_reverse: false },
    Question { id: 2, text: "Siento miedo sin ver razón para ello.", is_reverse: false },
    Question { id: 3, text: "Me enfado con facilidad o siento momentos de mal humor.", is_reverse: false },
    Question { id: 4, text: "Siento como si me derrumbara o me fuera a desintegrar.", is_reverse: false },
    Question { id: 5, text: "Siento que todo va bien y nada malo puede suceder.", is_reverse: true },
    Question { id: 6, text: "Los brazos y las piernas me ponen trémulos y me tiemblan.", is_reverse: false },
    Question { id: 7, text: "Me siento molesto por los dolores de cabeza, cuello y espalda.", is_reverse: false },
    Question { id: 8, text: "Me siento débil y me canso con facilidad.", is_reverse: false },
    Question { id: 9, text: "Me siento tranquilo y puedo permanecer sentado fácilmente.", is_reverse: true },
    Question { id: 10, text: "Siento que mi corazón late con rapidez.", is_reverse: false },
    Question { id: 11, text: "Estoy preocupado por los momentos de mareo que siento.", is_reverse: false },
    Question { id: 12, text: "Tengo períodos de desmayos o algo así.", is_reverse: false },
    Question { id: 13, text: "Puedo respirar bien, con facilidad.", is_reverse: true },
    Question { id: 14, text: "Siento adormecimiento y hormigueo en los dedos de las manos y de los pies.", is_reverse: false },
    Question { id: 15, text: "Me siento molesto por los dolores de estomago y digestiones.", is_reverse: false },
    Question { id: 16, text: "Tengo que orinar con mucha frecuencia.", is_reverse: false },
    Question { id: 17, text: "Mis manos la siento secas y cálidas.", is_reverse: true },
    Question { id: 18, text: "Siento que mi cara se enrojece y me ruborizo.", is_reverse: false },
    Question { id: 19, text: "Puedo dormir con facilidad y descansar bien.", is_reverse: true },
    Question { id: 20, text: "Tengo pesadillas.", is_reverse: false },
];

pub const OPTIONS: &[AnswerOption] = &[
    AnswerOption { value: 1, label: "Raramente" },
    AnswerOption { value: 2, label: "Algunas veces" },
    AnswerOption { value: 3, label: "Muchas veces" },
    AnswerOption { value: 4, label: "Siempre" },
];

pub const SCORE_BANDS: &[ScoreBand] = &[
    ScoreBand {
        upper_bound: 14,
        label: "Normal",
        severity: Severity::Normal,
        guidance: &[
            "Mantener hábitos de sueño regulares.",
            "Practicar actividad física al menos 3 veces por semana.",
            "Continuar con prácticas de autocuidado y tiempo de ocio.",
        ],
    },
    ScoreBand {
        upper_bound: 18,
        label: "Leve",
        severity: Severity::Mild,
        guidance: &[
            "Iniciarse en técnicas de respiración diafragmática.",
            "Evaluar y organizar la carga de tareas diarias.",
            "Practicar mindfulness o meditación guiada 10 minutos al día.",
        ],
    },
    ScoreBand {
        upper_bound: 25,
        label: "Moderada",
        severity: Severity::Moderate,
        guidance: &[
            "Reducir el consumo de cafeína y otros estimulantes.",
            "Establecer límites claros entre el trabajo y la vida personal.",
            "Considerar la consulta con un profesional para gestionar el estrés.",
        ],
    },
    ScoreBand {
        upper_bound: 33,
        label: "Severa",
        severity: Severity::Severe,
        guidance: &[
            "Priorizar la búsqueda de apoyo profesional psicológico.",
            "Hablar con personas de confianza sobre su estado emocional.",
            "Practicar técnicas de relajación muscular progresiva.",
        ],
    },
    ScoreBand {
        upper_bound: 100,
        label: "Extremadamente Severa",
        severity: Severity::ExtremelySevere,
        guidance: &[
            "Búsqueda inmediata de asistencia profesional especializada.",
            "Evitar la toma de decisiones importantes bajo este estado.",
            "Asegurar un entorno de apoyo constante y seguro.",
        ],
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("question bank is empty")]
    NoQuestions,
    #[error("question id {0} appears more than once")]
    DuplicateQuestion(u32),
    #[error("question id must be positive")]
    ZeroQuestionId,
    #[error("answer option set is empty")]
    NoOptions,
    #[error("answer option value {0} is zero or repeated")]
    InvalidOption(u8),
    #[error("score band list is empty")]
    NoBands,
    #[error("score band bound {bound} does not ascend past {previous}")]
    UnsortedBands { previous: u32, bound: u32 },
}

/// Non-empty, strictly ascending list of score bands.
#[derive(Debug, Clone, Copy)]
pub struct ScoreBands(&'static [ScoreBand]);

impl ScoreBands {
    pub fn new(bands: &'static [ScoreBand]) -> Result<Self, InventoryError> {
        if bands.is_empty() {
            return Err(InventoryError::NoBands);
        }
        for pair in bands.windows(2) {
            if pair[1].upper_bound <= pair[0].upper_bound {
                return Err(InventoryError::UnsortedBands {
                    previous: pair[0].upper_bound,
                    bound: pair[1].upper_bound,
                });
            }
        }
        Ok(Self(bands))
    }

    pub fn as_slice(&self) -> &'static [ScoreBand] {
        self.0
    }

    pub fn last(&self) -> &'static ScoreBand {
        &self.0[self.0.len() - 1]
    }
}

/// The question bank, option set and score bands a session is scored against.
#[derive(Debug, Clone, Copy)]
pub struct Inventory {
    questions: &'static [Question],
    options: &'static [AnswerOption],
    bands: ScoreBands,
}

impl Inventory {
    pub fn new(
        questions: &'static [Question],
        options: &'static [AnswerOption],
        bands: &'static [ScoreBand],
    ) -> Result<Self, InventoryError> {
        if questions.is_empty() {
            return Err(InventoryError::NoQuestions);
        }
        for (i, question) in questions.iter().enumerate() {
            if question.id == 0 {
                return Err(InventoryError::ZeroQuestionId);
            }
            if questions[..i].iter().any(|q| q.id == question.id) {
                return Err(InventoryError::DuplicateQuestion(question.id));
            }
        }

        if options.is_empty() {
            return Err(InventoryError::NoOptions);
        }
        for (i, option) in options.iter().enumerate() {
            if option.value == 0 || options[..i].iter().any(|o| o.value == option.value) {
                return Err(InventoryError::InvalidOption(option.value));
            }
        }

        Ok(Self {
            questions,
            options,
            bands: ScoreBands::new(bands)?,
        })
    }

    /// The built-in 20-item inventory.
    pub fn hamilton() -> Self {
        Self {
            questions: QUESTIONS,
            options: OPTIONS,
            bands: ScoreBands(SCORE_BANDS),
        }
    }

    pub fn questions(&self) -> &'static [Question] {
        self.questions
    }

    pub fn options(&self) -> &'static [AnswerOption] {
        self.options
    }

    pub fn bands(&self) -> &ScoreBands {
        &self.bands
    }

    pub fn question(&self, id: u32) -> Option<&'static Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn is_valid_value(&self, value: u8) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    pub fn max_option_value(&self) -> u8 {
        self.options.iter().map(|o| o.value).max().unwrap_or(0)
    }

    pub fn min_score(&self) -> u32 {
        let min = self.options.iter().map(|o| o.value).min().unwrap_or(0);
        self.questions.len() as u32 * min as u32
    }

    pub fn max_score(&self) -> u32 {
        self.questions.len() as u32 * self.max_option_value() as u32
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::hamilton()
    }
}

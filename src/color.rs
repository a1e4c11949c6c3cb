use serde::Serialize;

/// Traffic light state reported to the rest of the perception stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorLabel {
    Red,
    Yellow,
    Green,
    #[default]
    Unknown,
}

impl ColorLabel {
    /// Map a classifier class index to a label. Anything outside 0..=2 is `Unknown`.
    pub fn from_class_index(index: Option<usize>) -> Self {
        match index {
            Some(0) => ColorLabel::Red,
            Some(1) => ColorLabel::Yellow,
            Some(2) => ColorLabel::Green,
            _ => ColorLabel::Unknown,
        }
    }

    /// Numeric state code of the vehicle's traffic light message.
    pub fn code(self) -> u8 {
        match self {
            ColorLabel::Red => 0,
            ColorLabel::Yellow => 1,
            ColorLabel::Green => 2,
            ColorLabel::Unknown => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorLabel::Red => "RED",
            ColorLabel::Yellow => "YELLOW",
            ColorLabel::Green => "GREEN",
            ColorLabel::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

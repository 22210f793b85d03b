//! Dataset-specific output formatting
//!
//! Maps a raw prediction value to a display string and a badge, using a
//! fixed lookup by dataset name. Unknown datasets fall back to a plain
//! number. Formatting is total: it never fails and never returns an empty
//! value.

use serde::Serialize;

/// Semantic category used to color a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Positive,
    Negative,
    Neutral,
    Info,
}

impl Badge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Badge::Positive => "positive",
            Badge::Negative => "negative",
            Badge::Neutral => "neutral",
            Badge::Info => "info",
        }
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A prediction ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedOutput {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    pub badge: Badge,
}

/// Known prediction datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    TitanicSurvival,
    HeartDisease,
    Diabetes,
    SpamDetection,
    CustomerChurn,
    CarPrice,
    HousePrice,
    MovieRating,
}

const DATASETS: &[(&str, DatasetKind)] = &[
    ("Titanic Survival", DatasetKind::TitanicSurvival),
    ("Heart Disease", DatasetKind::HeartDisease),
    ("Diabetes", DatasetKind::Diabetes),
    ("Spam Detection", DatasetKind::SpamDetection),
    ("Customer Churn", DatasetKind::CustomerChurn),
    ("Car Price", DatasetKind::CarPrice),
    ("House Price", DatasetKind::HousePrice),
    ("Movie Rating", DatasetKind::MovieRating),
];

/// Classification threshold for binary datasets
const POSITIVE_CLASS: f64 = 0.5;

impl DatasetKind {
    /// Look up a dataset by name, exact match first
    pub fn lookup(dataset: &str) -> Option<Self> {
        let name = dataset.trim();
        DATASETS
            .iter()
            .find(|(n, _)| *n == name)
            .or_else(|| DATASETS.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)))
            .map(|(_, kind)| *kind)
    }

    pub fn name(&self) -> &'static str {
        DATASETS
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(n, _)| *n)
            .unwrap_or("Unknown")
    }

    /// Whether outputs are class labels (and may carry a confidence)
    pub fn is_classification(&self) -> bool {
        matches!(
            self,
            DatasetKind::TitanicSurvival
                | DatasetKind::HeartDisease
                | DatasetKind::Diabetes
                | DatasetKind::SpamDetection
                | DatasetKind::CustomerChurn
        )
    }

    fn format(&self, output: f64) -> (String, Badge) {
        let positive = output >= POSITIVE_CLASS;
        let label = |yes: &str, yes_badge: Badge, no: &str, no_badge: Badge| {
            if positive {
                (yes.to_string(), yes_badge)
            } else {
                (no.to_string(), no_badge)
            }
        };

        match self {
            DatasetKind::TitanicSurvival => {
                label("Survived", Badge::Positive, "Did not survive", Badge::Negative)
            }
            DatasetKind::HeartDisease => label(
                "Heart disease risk",
                Badge::Negative,
                "No heart disease",
                Badge::Positive,
            ),
            DatasetKind::Diabetes => {
                label("Diabetic", Badge::Negative, "Not diabetic", Badge::Positive)
            }
            DatasetKind::SpamDetection => label("Spam", Badge::Negative, "Not spam", Badge::Positive),
            DatasetKind::CustomerChurn => {
                label("Will churn", Badge::Negative, "Will stay", Badge::Positive)
            }
            DatasetKind::CarPrice | DatasetKind::HousePrice => (format_currency(output), Badge::Info),
            DatasetKind::MovieRating => {
                let badge = if output >= 7.0 {
                    Badge::Positive
                } else if output < 5.0 {
                    Badge::Negative
                } else {
                    Badge::Neutral
                };
                if output.is_finite() {
                    (format!("{:.1}/10", output), badge)
                } else {
                    (format_number(output), Badge::Neutral)
                }
            }
        }
    }
}

/// Format a prediction value for display
pub fn format_output(dataset: &str, output: f64, confidence: Option<f64>) -> FormattedOutput {
    let (value, badge) = match DatasetKind::lookup(dataset) {
        Some(kind) => kind.format(output),
        None => (format_number(output), Badge::Neutral),
    };

    FormattedOutput {
        value,
        confidence: confidence.map(format_confidence),
        badge,
    }
}

/// Confidence in [0, 1] as a percentage with one decimal
pub fn format_confidence(confidence: f64) -> String {
    if confidence.is_finite() {
        format!("{:.1}%", confidence * 100.0)
    } else {
        format!("{}%", format_number(confidence))
    }
}

/// Plain number: shortest decimal that round-trips
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let symbol = if value > 0.0 { "∞" } else { "-∞" };
        symbol.to_string()
    } else {
        format!("{}", value)
    }
}

/// Whole dollars with thousands separators, e.g. `$18,500`
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format_number(value);
    }

    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(&digits))
}

/// Insert `,` every three digits from the right
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

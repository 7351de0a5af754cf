// Series definitions - the chart's fixed channel table
use serde::{Deserialize, Serialize};

/// One plotted channel: the record field it reads and its legend title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesDefinition {
    #[serde(rename = "valueField", alias = "value_field")]
    pub value_field: String,
    pub title: String,
}

impl SeriesDefinition {
    pub fn new(value_field: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            value_field: value_field.into(),
            title: title.into(),
        }
    }

    /// The space-shuttle valve channels, in legend order.
    pub fn defaults() -> Vec<SeriesDefinition> {
        [
            ("1.0", "Rad Flow"),
            ("2.0", "Fpv Close"),
            ("3.0", "Fpv Open"),
            ("4.0", "High"),
            ("5.0", "Bypass"),
            ("6.0", "Bpv Close"),
            ("7.0", "Bpv Open"),
        ]
        .into_iter()
        .map(|(field, title)| SeriesDefinition::new(field, title))
        .collect()
    }
}

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ChartSeries: one named line in a chart payload
// ---------------------------------------------------------------------------

/// A named series of values aligned with the payload's date axis.
///
/// Styling fields are optional and left out of the JSON when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dashed: bool,
    /// Line drawn fully transparent (used for stacked band bases).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden_line: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub silent: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub connect_nulls: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<i32>,
}

impl ChartSeries {
    pub fn line(name: impl Into<String>, data: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            kind: "line".to_string(),
            data,
            color: None,
            line_width: None,
            dashed: false,
            hidden_line: false,
            area_color: None,
            stack: None,
            silent: false,
            connect_nulls: false,
            z: None,
        }
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.line_width = Some(width);
        self
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }

    pub fn hidden_line(mut self) -> Self {
        self.hidden_line = true;
        self
    }

    pub fn area(mut self, color: &str) -> Self {
        self.area_color = Some(color.to_string());
        self
    }

    pub fn stacked(mut self, stack: &str) -> Self {
        self.stack = Some(stack.to_string());
        self
    }

    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    pub fn connect_nulls(mut self) -> Self {
        self.connect_nulls = true;
        self
    }

    pub fn z(mut self, z: i32) -> Self {
        self.z = Some(z);
        self
    }
}

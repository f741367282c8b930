use crate::foundation::{
    core::Rgb8,
    error::{CollageError, CollageResult},
};

/// Validated canvas configuration consumed by the layout engine and the compositor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSettings {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Inset on all four sides; only the inner safe area receives tile pixels.
    pub border: u32,
    /// Fill color behind all tiles.
    pub background: Rgb8,
    /// Legacy global radius, used for tiles whose own radius is 0.
    pub corner_radius: u32,
    /// Last scale factor entered by the user. Recorded, never applied implicitly.
    pub scale: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            border: 20,
            background: Rgb8::BLACK,
            corner_radius: 0,
            scale: 1.0,
        }
    }
}

impl CanvasSettings {
    /// Reject zero sizes, a border that leaves no safe area, and a non-finite scale.
    pub fn validate(&self) -> CollageResult<()> {
        if self.width == 0 {
            return Err(CollageError::config("width", "must be > 0, got 0"));
        }
        if self.height == 0 {
            return Err(CollageError::config("height", "must be > 0, got 0"));
        }
        if u64::from(self.border) * 2 >= u64::from(self.width) {
            return Err(CollageError::config(
                "border",
                format!(
                    "2 * border must be < width, got border {} for width {}",
                    self.border, self.width
                ),
            ));
        }
        if !self.scale.is_finite() {
            return Err(CollageError::config(
                "scale",
                format!("must be finite, got {}", self.scale),
            ));
        }
        Ok(())
    }

    /// Editor-facing form, with every value rendered as a string.
    pub fn to_input(&self) -> CanvasSettingsInput {
        CanvasSettingsInput {
            width: SettingValue::Text(self.width.to_string()),
            height: SettingValue::Text(self.height.to_string()),
            border: SettingValue::Text(self.border.to_string()),
            bg_color: self.background.to_string(),
            corner_radius: SettingValue::Text(self.corner_radius.to_string()),
            scale: SettingValue::Text(format_scale(self.scale)),
        }
    }
}

fn format_scale(scale: f64) -> String {
    if scale.fract() == 0.0 {
        format!("{scale:.0}")
    } else {
        scale.to_string()
    }
}

/// A setting as typed by a user or stored in a project: a JSON number or a string.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// JSON integer.
    Int(i64),
    /// JSON float.
    Float(f64),
    /// Raw text as typed; trimmed before parsing.
    Text(String),
}

impl SettingValue {
    fn as_u32(&self, field: &str) -> CollageResult<u32> {
        let v = match self {
            Self::Int(v) => *v,
            Self::Float(f) if f.fract() == 0.0 && f.is_finite() => *f as i64,
            Self::Float(f) => {
                return Err(CollageError::config(
                    field,
                    format!("must be an integer, got {f}"),
                ));
            }
            Self::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                CollageError::config(field, format!("must be an integer, got \"{s}\""))
            })?,
        };
        u32::try_from(v).map_err(|_| {
            CollageError::config(field, format!("must be a non-negative integer, got {v}"))
        })
    }

    fn as_f64(&self, field: &str) -> CollageResult<f64> {
        match self {
            Self::Int(v) => Ok(*v as f64),
            Self::Float(f) => Ok(*f),
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| CollageError::config(field, format!("must be a number, got \"{s}\""))),
        }
    }
}

impl From<u32> for SettingValue {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

/// Lenient canvas settings as entered in the editor or stored in a project file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSettingsInput {
    /// Canvas width.
    pub width: SettingValue,
    /// Canvas height.
    pub height: SettingValue,
    /// Border inset.
    pub border: SettingValue,
    /// `#RRGGBB`; anything else falls back to black.
    pub bg_color: String,
    /// Legacy global corner radius.
    pub corner_radius: SettingValue,
    /// Last scale factor; `"2"` when absent.
    #[serde(default = "default_scale")]
    pub scale: SettingValue,
}

fn default_scale() -> SettingValue {
    SettingValue::Text("2".to_owned())
}

impl Default for CanvasSettingsInput {
    fn default() -> Self {
        CanvasSettings::default().to_input()
    }
}

impl TryFrom<&CanvasSettingsInput> for CanvasSettings {
    type Error = CollageError;

    fn try_from(input: &CanvasSettingsInput) -> CollageResult<Self> {
        let background = Rgb8::parse_hex(&input.bg_color).unwrap_or_else(|err| {
            tracing::warn!(%err, "unparseable background color, using black");
            Rgb8::BLACK
        });
        let settings = CanvasSettings {
            width: input.width.as_u32("width")?,
            height: input.height.as_u32("height")?,
            border: input.border.as_u32("border")?,
            background,
            corner_radius: input.corner_radius.as_u32("corner_radius")?,
            scale: input.scale.as_f64("scale")?,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl TryFrom<CanvasSettingsInput> for CanvasSettings {
    type Error = CollageError;

    fn try_from(input: CanvasSettingsInput) -> CollageResult<Self> {
        CanvasSettings::try_from(&input)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/settings.rs"]
mod tests;

//! Engine options and the shallow-merge update path.

use serde::Deserialize;
use serde::de::{self, Deserializer};
use std::fmt;
use std::rc::Rc;

/// Callback run after every drawn frame.
pub type AfterDraw = Rc<dyn Fn()>;

/// Surface height policy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Height {
    /// Track the container's rendered height.
    #[default]
    FillParent,
    /// Fixed logical height in device-independent units.
    Fixed(f64),
}

/// Accepts `-1` (the fill-parent sentinel), a non-negative number, or `"fill"`.
impl<'de> Deserialize<'de> for Height {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Keyword(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) if n == -1.0 => Ok(Height::FillParent),
            Raw::Number(n) if n.is_finite() && n >= 0.0 => Ok(Height::Fixed(n)),
            Raw::Number(n) => Err(de::Error::custom(format!("invalid height {n}"))),
            Raw::Keyword(k) if k == "fill" => Ok(Height::FillParent),
            Raw::Keyword(k) => Err(de::Error::unknown_variant(&k, &["fill"])),
        }
    }
}

/// Current engine configuration.
#[derive(Clone, Default)]
pub struct Options {
    pub height: Height,
    pub show_fps: bool,
    pub after_draw: Option<AfterDraw>,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("height", &self.height)
            .field("show_fps", &self.show_fps)
            .field("after_draw", &self.after_draw.is_some())
            .finish()
    }
}

impl Options {
    pub fn fixed_height(height: f64) -> Self {
        Self {
            height: Height::Fixed(height),
            ..Default::default()
        }
    }

    /// Shallow merge: every field set in `patch` replaces the current value.
    pub fn merge(&mut self, patch: OptionsPatch) {
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(show_fps) = patch.show_fps {
            self.show_fps = show_fps;
        }
        if let Some(after_draw) = patch.after_draw {
            self.after_draw = Some(after_draw);
        }
    }
}

/// Partial options update.
///
/// JSON form: `{"height": -1 | 240 | "fill", "showFPS": true}`. The
/// after-draw callback cannot come from JSON and is set in code.
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsPatch {
    #[serde(default)]
    pub height: Option<Height>,
    #[serde(default, rename = "showFPS", alias = "showFps")]
    pub show_fps: Option<bool>,
    #[serde(skip)]
    pub after_draw: Option<AfterDraw>,
}

impl fmt::Debug for OptionsPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsPatch")
            .field("height", &self.height)
            .field("show_fps", &self.show_fps)
            .field("after_draw", &self.after_draw.is_some())
            .finish()
    }
}

impl OptionsPatch {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn height(mut self, height: Height) -> Self {
        self.height = Some(height);
        self
    }

    pub fn show_fps(mut self, show_fps: bool) -> Self {
        self.show_fps = Some(show_fps);
        self
    }

    pub fn after_draw(mut self, after_draw: impl Fn() + 'static) -> Self {
        self.after_draw = Some(Rc::new(after_draw));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[test]
    fn merge_only_touches_set_fields() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut options = Options {
            height: Height::Fixed(240.0),
            show_fps: false,
            after_draw: Some(Rc::new(move || counter.set(counter.get() + 1))),
        };

        options.merge(OptionsPatch::default().show_fps(true));

        assert!(options.show_fps);
        assert_eq!(options.height, Height::Fixed(240.0));
        (options.after_draw.as_ref().unwrap())();
        assert_eq!(calls.get(), 1, "after_draw should survive the merge");
    }

    #[test]
    fn later_keys_win() {
        let mut options = Options::default();
        options.merge(OptionsPatch::default().height(Height::Fixed(100.0)));
        options.merge(OptionsPatch::default().height(Height::FillParent));
        assert_eq!(options.height, Height::FillParent);
    }

    #[test]
    fn json_patch_accepts_sentinel_and_keyword() {
        let patch = OptionsPatch::from_json(r#"{"height": -1, "showFPS": true}"#).unwrap();
        assert_eq!(patch.height, Some(Height::FillParent));
        assert_eq!(patch.show_fps, Some(true));

        let patch = OptionsPatch::from_json(r#"{"height": "fill"}"#).unwrap();
        assert_eq!(patch.height, Some(Height::FillParent));

        let patch = OptionsPatch::from_json(r#"{"height": 320}"#).unwrap();
        assert_eq!(patch.height, Some(Height::Fixed(320.0)));
        assert_eq!(patch.show_fps, None);
    }

    #[test]
    fn json_patch_rejects_garbage() {
        assert!(OptionsPatch::from_json(r#"{"height": -5}"#).is_err());
        assert!(OptionsPatch::from_json(r#"{"height": "tall"}"#).is_err());
        assert!(OptionsPatch::from_json(r#"{"width": 3}"#).is_err());
    }
}

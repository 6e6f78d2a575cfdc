use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::field::{Field, null_default};

/// Success message used when neither the post-submit config nor the legacy
/// settings provide one.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Thank you for your submission!";

/// Delay applied when a `delay` trigger does not specify one.
pub const DEFAULT_DELAY_SECONDS: u64 = 3;

/// One page of the wizard. Ordering defines navigation order; membership
/// defines page boundaries, not visibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Step {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub fields: Vec<String>,
}

/// Persists one submitted field value as client-side memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CookieRule {
    pub name: String,
    pub field_id: String,
    #[serde(default = "default_expires_days")]
    pub expires_days: u32,
}

fn default_expires_days() -> u32 {
    30
}

/// Behavior executed after a confirmed-successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PostSubmitAction {
    #[default]
    Message,
    Redirect,
    RedirectWithData,
    PersonalizedMessage,
    /// Unrecognized actions behave like `message`.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PostSubmitConfig {
    pub action: PostSubmitAction,
    pub success_message: Option<String>,
    /// Template with `{field_id}` tokens, interpolated from submitted values.
    pub personalization_template: Option<String>,
    pub redirect_url: Option<String>,
    pub append_data_to_url: bool,
}

/// How the form is presented on the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    #[default]
    Inline,
    Popup,
    SlideLeft,
    SlideRight,
    SlideBottom,
    /// Unrecognized modes degrade to inline presentation.
    #[serde(other)]
    Unknown,
}

impl DisplayMode {
    pub fn is_inline(&self) -> bool {
        matches!(self, DisplayMode::Inline | DisplayMode::Unknown)
    }
}

/// Event that makes a non-inline form visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayTrigger {
    #[default]
    Immediate,
    Delay,
    Scroll,
    ExitIntent,
    /// Unrecognized triggers behave like `immediate`.
    #[serde(other)]
    Unknown,
}

/// When and how the form becomes visible. `trigger` is only meaningful for
/// non-inline modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    pub trigger: DisplayTrigger,
    #[serde(alias = "delay")]
    pub delay_seconds: u64,
    /// Presentation hint: dim the host page behind the form.
    pub overlay: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::default(),
            trigger: DisplayTrigger::default(),
            delay_seconds: DEFAULT_DELAY_SECONDS,
            overlay: false,
        }
    }
}

/// Theming knobs. Opaque to the engine; passed through to renderers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    pub primary_color: Option<String>,
    pub background_color: Option<String>,
    pub label_color: Option<String>,
    pub input_border_color: Option<String>,
    pub button_text_color: Option<String>,
    pub border_radius: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<String>,
}

impl StyleConfig {
    pub fn primary_color(&self) -> &str {
        self.primary_color.as_deref().unwrap_or("#5C6AC4")
    }

    pub fn background_color(&self) -> &str {
        self.background_color.as_deref().unwrap_or("#ffffff")
    }

    pub fn label_color(&self) -> &str {
        self.label_color.as_deref().unwrap_or("#374151")
    }

    pub fn input_border_color(&self) -> &str {
        self.input_border_color.as_deref().unwrap_or("#d1d5db")
    }

    pub fn button_text_color(&self) -> &str {
        self.button_text_color.as_deref().unwrap_or("#ffffff")
    }

    pub fn border_radius(&self) -> &str {
        self.border_radius.as_deref().unwrap_or("8px")
    }

    pub fn font_family(&self) -> &str {
        self.font_family.as_deref().unwrap_or("sans-serif")
    }

    pub fn font_size(&self) -> &str {
        self.font_size.as_deref().unwrap_or("14px")
    }
}

/// Where the decorative image sits relative to the form body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImagePosition {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImageConfig {
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub position: ImagePosition,
}

/// Legacy settings block kept for forms authored before the post-submit
/// config existed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FormSettings {
    pub submit_button_text: Option<String>,
    pub success_message: Option<String>,
    pub redirect_url: Option<String>,
}

impl FormSettings {
    pub fn submit_button_text(&self) -> &str {
        self.submit_button_text.as_deref().unwrap_or("Submit")
    }
}

/// The declarative form document. Produced by the builder or the AI
/// generator; read-only to the engine for the duration of one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub fields: Vec<Field>,
    #[serde(default, deserialize_with = "null_default")]
    pub steps: Vec<Step>,
    #[serde(default, deserialize_with = "null_default")]
    pub display: DisplayConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageConfig>,
    #[serde(default, deserialize_with = "null_default")]
    pub cookies: Vec<CookieRule>,
    #[serde(default, deserialize_with = "null_default", alias = "post_submit")]
    pub post_submit: PostSubmitConfig,
    #[serde(default, deserialize_with = "null_default")]
    pub styles: StyleConfig,
    #[serde(default, deserialize_with = "null_default")]
    pub settings: FormSettings,
}

impl FormSchema {
    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    /// Wizard pages. A schema without explicit steps acts as a single page
    /// holding every field.
    pub fn effective_steps(&self) -> Vec<Step> {
        if self.steps.is_empty() {
            vec![Step {
                title: String::new(),
                fields: self.fields.iter().map(|field| field.id.clone()).collect(),
            }]
        } else {
            self.steps.clone()
        }
    }
}

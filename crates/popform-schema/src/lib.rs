#![allow(missing_docs)]

pub mod condition;
pub mod integrity;
pub mod schema;
pub mod template;
pub mod validate;

pub use condition::{VisibilityMap, is_visible, resolve_visibility, text_value};
pub use integrity::{IntegrityWarning, check_integrity};
pub use schema::{
    Condition, ConditionAction, ConditionOperator, ConditionTarget, CookieRule, DEFAULT_DELAY_SECONDS,
    DEFAULT_SUCCESS_MESSAGE, DisplayConfig, DisplayMode, DisplayTrigger, Field, FieldType,
    FormSchema, FormSettings, ImageConfig, ImagePosition, PostSubmitAction, PostSubmitConfig, Step,
    StyleConfig, Validations,
};
pub use template::interpolate;
pub use validate::{validate_field, validate_step};

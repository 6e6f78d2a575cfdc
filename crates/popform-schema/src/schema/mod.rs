pub mod field;
pub mod form;

pub use field::{
    Condition, ConditionAction, ConditionOperator, ConditionTarget, Field, FieldType, Validations,
};
pub use form::{
    CookieRule, DEFAULT_DELAY_SECONDS, DEFAULT_SUCCESS_MESSAGE, DisplayConfig, DisplayMode,
    DisplayTrigger, FormSchema, FormSettings, ImageConfig, ImagePosition, PostSubmitAction,
    PostSubmitConfig, Step, StyleConfig,
};

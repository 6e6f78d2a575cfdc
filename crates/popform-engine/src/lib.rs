#![allow(missing_docs)]

pub mod cookies;
pub mod dispatch;
pub mod display;
pub mod engine;
pub mod render;
pub mod session;
pub mod steps;

pub use cookies::{CookieError, CookieStore, MemoryCookieStore, apply_prefills, persist_rules};
pub use dispatch::{Navigator, PostSubmitEffect, dispatch};
pub use display::{DisplayController, DisplayPhase, Listener, SCROLL_THRESHOLD, display_label};
pub use engine::{FormEngine, SubmitStart, SubmitTransport, TransportError};
pub use render::{RenderField, RenderPayload, build_render_payload, render_json_ui, render_text};
pub use session::{SessionState, Snapshot, SubmissionStatus};
pub use steps::{StepAdvance, StepEngine};

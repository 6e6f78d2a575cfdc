use serde_json::{Map, Value};

use popform_schema::{DEFAULT_SUCCESS_MESSAGE, FormSchema, PostSubmitAction, interpolate, text_value};

/// Host-page navigation primitive.
pub trait Navigator {
    fn redirect_to(&mut self, url: &str);
}

/// Resolved outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostSubmitEffect {
    /// Show the text in place of the form.
    ShowMessage(String),
    /// Acknowledge with the message, then navigate to the url.
    Redirect { url: String, acknowledgment: String },
}

impl PostSubmitEffect {
    /// The text a renderer shows, for both variants.
    pub fn message(&self) -> &str {
        match self {
            PostSubmitEffect::ShowMessage(text) => text,
            PostSubmitEffect::Redirect { acknowledgment, .. } => acknowledgment,
        }
    }

    /// Runs the navigation half of the effect, if any.
    pub fn execute(&self, navigator: &mut dyn Navigator) {
        if let PostSubmitEffect::Redirect { url, .. } = self {
            navigator.redirect_to(url);
        }
    }
}

/// Success-message fallback chain: post-submit config, then legacy
/// settings, then the built-in default. Empty strings fall through.
fn success_message(schema: &FormSchema) -> String {
    schema
        .post_submit
        .success_message
        .clone()
        .filter(|message| !message.is_empty())
        .or_else(|| {
            schema
                .settings
                .success_message
                .clone()
                .filter(|message| !message.is_empty())
        })
        .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string())
}

/// Selects and resolves the configured post-submit action against the
/// submitted values. Misconfigured redirects degrade to the message
/// effect; unknown actions behave like `message`.
pub fn dispatch(schema: &FormSchema, values: &Map<String, Value>) -> PostSubmitEffect {
    let config = &schema.post_submit;
    let message = success_message(schema);
    match config.action {
        PostSubmitAction::Message | PostSubmitAction::Unknown => {
            // Forms authored before the post-submit config carried the
            // redirect in settings.
            match legacy_redirect(schema) {
                Some(url) => PostSubmitEffect::Redirect {
                    url,
                    acknowledgment: message,
                },
                None => PostSubmitEffect::ShowMessage(message),
            }
        }
        PostSubmitAction::PersonalizedMessage => match &config.personalization_template {
            Some(template) if !template.is_empty() => {
                PostSubmitEffect::ShowMessage(interpolate(template, values))
            }
            _ => PostSubmitEffect::ShowMessage(message),
        },
        PostSubmitAction::Redirect => redirect_effect(config.redirect_url.as_deref(), None, message),
        PostSubmitAction::RedirectWithData => {
            let data = config.append_data_to_url.then_some((schema, values));
            redirect_effect(config.redirect_url.as_deref(), data, message)
        }
    }
}

fn legacy_redirect(schema: &FormSchema) -> Option<String> {
    schema
        .settings
        .redirect_url
        .clone()
        .filter(|url| !url.is_empty())
}

fn redirect_effect(
    url: Option<&str>,
    data: Option<(&FormSchema, &Map<String, Value>)>,
    acknowledgment: String,
) -> PostSubmitEffect {
    match url {
        Some(url) if !url.is_empty() => {
            let url = match data {
                Some((schema, values)) => with_query_data(url, schema, values),
                None => url.to_string(),
            };
            PostSubmitEffect::Redirect { url, acknowledgment }
        }
        _ => PostSubmitEffect::ShowMessage(acknowledgment),
    }
}

/// Appends every submitted field value to the url's query string, in
/// schema field order. Values are percent-encoded (space becomes `%20`);
/// array values join with `,` before encoding; empty values are skipped.
fn with_query_data(url: &str, schema: &FormSchema, values: &Map<String, Value>) -> String {
    let mut query = String::new();
    for field in &schema.fields {
        let Some(value) = values.get(&field.id) else {
            continue;
        };
        let text = text_value(Some(value));
        if text.is_empty() {
            continue;
        }
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&urlencoding::encode(&field.id));
        query.push('=');
        query.push_str(&urlencoding::encode(&text));
    }
    if query.is_empty() {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

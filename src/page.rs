use handlebars::Handlebars;
use serde_json::{json, Value};

use crate::types::MessageRequest;

pub const TITLE: &str = "Send a Message to Someone Using AI";

const TEMPLATE_NAME: &str = "page";
const PAGE_HTML: &str = include_str!("page.html");

const FIELDS: [(&str, &str); 4] = [
    ("number", "Recipient Number"),
    ("reason", "Your reason to send the message is..."),
    ("relation", "The recipient is your ... (ie. Mom)"),
    ("context", "A bit of context of the conversation..."),
];

/// What the output area shows under the form.
pub enum Outcome<'a> {
    Empty,
    Message(&'a str),
    Failed(&'a str),
}

/// The form page, registered once and rendered per request.
pub struct Page {
    registry: Handlebars<'static>,
}

impl Page {
    pub fn new() -> anyhow::Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string(TEMPLATE_NAME, PAGE_HTML)?;
        Ok(Self { registry })
    }

    pub fn render(&self, form: &MessageRequest, outcome: Outcome<'_>) -> anyhow::Result<String> {
        let (msg, error) = match outcome {
            Outcome::Empty => ("", ""),
            Outcome::Message(msg) => (msg, ""),
            Outcome::Failed(reason) => ("", reason),
        };

        let values = [&form.number, &form.reason, &form.relation, &form.context];
        let fields: Vec<Value> = FIELDS
            .iter()
            .zip(values)
            .map(|((name, label), value)| json!({ "name": name, "label": label, "value": value }))
            .collect();

        let ctx = json!({
            "title": TITLE,
            "fields": fields,
            "msg": msg,
            "error": error,
        });
        Ok(self.registry.render(TEMPLATE_NAME, &ctx)?)
    }
}

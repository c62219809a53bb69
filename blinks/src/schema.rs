//! Request and response bodies of the Solana Actions protocol.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Action,
    Completed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionGetResponse {
    #[serde(rename = "type")]
    pub kind: ActionType,
    pub icon: String,
    pub title: String,
    pub description: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ActionLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ActionError>,
}

impl ActionGetResponse {
    pub fn new(icon: &str, title: &str, description: &str, label: &str) -> Self {
        Self {
            kind: ActionType::Action,
            icon: icon.into(),
            title: title.into(),
            description: description.into(),
            label: label.into(),
            disabled: None,
            links: None,
            error: None,
        }
    }

    /// Disables the action and shows `message` to the user.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.disabled = Some(true);
        self.error = Some(ActionError {
            message: message.into(),
        });
        self
    }

    pub fn with_links(mut self, actions: Vec<LinkedAction>) -> Self {
        self.links = Some(ActionLinks { actions });
        self
    }

    /// Terminal state of an action chain; nothing left to click.
    pub fn completed(mut self) -> Self {
        self.kind = ActionType::Completed;
        self.disabled = Some(true);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionLinks {
    pub actions: Vec<LinkedAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkedAction {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub href: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ActionParameter>>,
}

impl LinkedAction {
    pub fn transaction(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: "transaction",
            href: href.into(),
            label: label.into(),
            parameters: None,
        }
    }

    pub fn external(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: "external-link",
            href: href.into(),
            label: label.into(),
            parameters: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<ActionParameter>) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Text,
    Textarea,
    Number,
    Radio,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionParameter {
    #[serde(rename = "type")]
    pub kind: ParameterType,
    pub name: String,
    pub label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<ActionParameterOption>>,
}

impl ActionParameter {
    fn base(kind: ParameterType, name: &str, label: &str, required: bool) -> Self {
        Self {
            kind,
            name: name.into(),
            label: label.into(),
            required,
            min: None,
            max: None,
            pattern: None,
            pattern_description: None,
            options: None,
        }
    }

    pub fn number(name: &str, label: &str, required: bool) -> Self {
        Self::base(ParameterType::Number, name, label, required)
    }

    pub fn textarea(name: &str, label: &str, required: bool) -> Self {
        Self::base(ParameterType::Textarea, name, label, required)
    }

    pub fn radio(name: &str, label: &str, options: Vec<ActionParameterOption>) -> Self {
        let mut param = Self::base(ParameterType::Radio, name, label, true);
        param.options = Some(options);
        param
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_pattern(mut self, pattern: &str, description: &str) -> Self {
        self.pattern = Some(pattern.into());
        self.pattern_description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionParameterOption {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
}

impl ActionParameterOption {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            selected: false,
        }
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ActionPostRequest {
    pub account: String,
}

#[derive(Debug, Serialize)]
pub struct ActionPostResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub transaction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<PostLinks>,
}

impl ActionPostResponse {
    pub fn new(transaction: String, message: String) -> Self {
        Self {
            kind: "transaction",
            transaction,
            message: Some(message),
            links: None,
        }
    }

    /// Ask the client to report the signature to `href` once the transaction lands.
    pub fn with_next(mut self, href: String) -> Self {
        self.links = Some(PostLinks {
            next: NextActionLink::Post { href },
        });
        self
    }
}

#[derive(Debug, Serialize)]
pub struct PostLinks {
    pub next: NextActionLink,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NextActionLink {
    Post { href: String },
}

/// Body of the callback a client sends after the transaction was submitted.
#[derive(Debug, Deserialize)]
pub struct NextActionPostRequest {
    pub account: String,
    pub signature: String,
}

#[derive(Debug, Serialize)]
pub struct ActionsJson {
    pub rules: Vec<ActionRule>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRule {
    pub path_pattern: String,
    pub api_path: String,
}

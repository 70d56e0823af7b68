//! Fluent validation builder.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
pub use futures::future::BoxFuture;

use super::error::ValidationError;
use super::result::{FieldError, ValidationResult};
use super::validatable::Validatable;

type SyncRule<V> = Box<dyn Fn(&V) -> Result<(), String> + Send + Sync>;

type AsyncRule<V> = Box<dyn Fn(V) -> BoxFuture<'static, Result<(), String>> + Send + Sync>;

/// A field whose rules have been frozen into closures over its control.
struct FieldEntry {
    name: String,
    widget_id: String,
    set_error: Box<dyn Fn(Option<String>) + Send + Sync>,
    validate_sync: Box<dyn Fn() -> Vec<String> + Send + Sync>,
    validate_async: Box<dyn Fn() -> BoxFuture<'static, Vec<String>> + Send + Sync>,
}

impl FieldEntry {
    /// Write the outcome back to the control and report a failure.
    fn record(&self, messages: Vec<String>) -> Option<FieldError> {
        match messages.into_iter().next() {
            Some(message) => {
                log::debug!("validation: {} failed: {}", self.name, message);
                (self.set_error)(Some(message.clone()));
                Some(FieldError {
                    field_name: self.name.clone(),
                    widget_id: self.widget_id.clone(),
                    message,
                })
            }
            None => {
                (self.set_error)(None);
                None
            }
        }
    }
}

/// Validates several controls in one pass.
///
/// Each field reports only its first failing rule.
#[derive(Default)]
pub struct Validator {
    fields: Vec<FieldEntry>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start adding rules for `widget`.
    pub fn field<W: Validatable + Clone + 'static>(
        self,
        widget: &W,
        name: impl Into<String>,
    ) -> FieldBuilder<W>
    where
        W::Value: Clone + Send + 'static,
    {
        FieldBuilder {
            validator: self,
            widget: widget.clone(),
            name: name.into(),
            sync_rules: Vec::new(),
            async_rules: Vec::new(),
        }
    }

    /// Run synchronous rules only.
    pub fn validate(self) -> ValidationResult {
        let errors = self
            .fields
            .iter()
            .filter_map(|field| field.record((field.validate_sync)()))
            .collect();
        ValidationResult::from_errors(errors)
    }

    /// Run synchronous and asynchronous rules.
    pub async fn validate_async(self) -> ValidationResult {
        let mut errors = Vec::new();
        for field in &self.fields {
            let messages = (field.validate_async)().await;
            errors.extend(field.record(messages));
        }
        ValidationResult::from_errors(errors)
    }
}

/// Rules for a single field.
pub struct FieldBuilder<W: Validatable> {
    validator: Validator,
    widget: W,
    name: String,
    sync_rules: Vec<SyncRule<W::Value>>,
    async_rules: Vec<AsyncRule<W::Value>>,
}

impl<W: Validatable + Clone + 'static> FieldBuilder<W>
where
    W::Value: Clone + Send + 'static,
{
    /// Add a custom synchronous rule; `f` returns true when valid.
    pub fn rule<F>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&W::Value) -> bool + Send + Sync + 'static,
    {
        let msg = msg.into();
        self.sync_rules
            .push(Box::new(move |v| if f(v) { Ok(()) } else { Err(msg.clone()) }));
        self
    }

    /// Add a custom asynchronous rule; the future resolves to true when valid.
    pub fn rule_async<F, Fut>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(W::Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let msg = msg.into();
        self.async_rules.push(Box::new(move |v| {
            let fut = f(v);
            let msg = msg.clone();
            async move { if fut.await { Ok(()) } else { Err(msg) } }.boxed()
        }));
        self
    }

    /// Continue to the next field.
    pub fn field<W2: Validatable + Clone + 'static>(
        self,
        widget: &W2,
        name: impl Into<String>,
    ) -> FieldBuilder<W2>
    where
        W2::Value: Clone + Send + 'static,
    {
        self.finalize().field(widget, name)
    }

    pub fn validate(self) -> ValidationResult {
        self.finalize().validate()
    }

    pub async fn validate_async(self) -> ValidationResult {
        self.finalize().validate_async().await
    }

    /// Freeze this field's rules and hand back the validator.
    fn finalize(self) -> Validator {
        let widget_id = self.widget.widget_id();
        let sync_rules = Arc::new(self.sync_rules);
        let async_rules = Arc::new(self.async_rules);

        let widget = self.widget.clone();
        let rules = Arc::clone(&sync_rules);
        let validate_sync = Box::new(move || {
            let value = widget.validation_value();
            rules
                .iter()
                .filter_map(|rule| rule(&value).err())
                .collect::<Vec<String>>()
        });

        let widget = self.widget.clone();
        let validate_async = Box::new(move || {
            let value = widget.validation_value();
            let sync_rules = Arc::clone(&sync_rules);
            let async_rules = Arc::clone(&async_rules);
            async move {
                let mut errors: Vec<String> =
                    sync_rules.iter().filter_map(|rule| rule(&value).err()).collect();
                for rule in async_rules.iter() {
                    if let Err(msg) = rule(value.clone()).await {
                        errors.push(msg);
                    }
                }
                errors
            }
            .boxed()
        });

        let widget = self.widget;
        let set_error = Box::new(move |msg: Option<String>| match msg {
            Some(msg) => widget.set_error(msg),
            None => widget.clear_error(),
        });

        let mut validator = self.validator;
        validator.fields.push(FieldEntry {
            name: self.name,
            widget_id,
            set_error,
            validate_sync,
            validate_async,
        });
        validator
    }
}

// Built-in rules for text values
impl<W: Validatable<Value = String> + Clone + 'static> FieldBuilder<W> {
    /// Require non-whitespace text.
    pub fn required(self, msg: impl Into<String>) -> Self {
        self.rule(|v| !v.trim().is_empty(), msg)
    }

    /// Require at least `min` characters.
    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.chars().count() >= min, msg)
    }

    /// Allow at most `max` characters.
    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.chars().count() <= max, msg)
    }

    /// Require the text to match a regular expression.
    pub fn pattern(self, pattern: &str, msg: impl Into<String>) -> Result<Self, ValidationError> {
        let re = regex::Regex::new(pattern).map_err(|source| ValidationError::InvalidPattern {
            field: self.name.clone(),
            source,
        })?;
        Ok(self.rule(move |v| re.is_match(v), msg))
    }

    /// Require a valid email address. Empty text passes; pair with `required`.
    pub fn email(self, msg: impl Into<String>) -> Self {
        self.rule(
            |v| v.is_empty() || email_address::EmailAddress::is_valid(v),
            msg,
        )
    }

    pub fn equals(self, other: impl Into<String>, msg: impl Into<String>) -> Self {
        let other = other.into();
        self.rule(move |v| *v == other, msg)
    }

    pub fn contains(self, substr: impl Into<String>, msg: impl Into<String>) -> Self {
        let substr = substr.into();
        self.rule(move |v| v.contains(&substr), msg)
    }
}

// Built-in rules for select values
impl<W, T> FieldBuilder<W>
where
    W: Validatable<Value = Option<T>> + Clone + 'static,
    T: PartialEq + Clone + Send + Sync + 'static,
{
    /// Require some option to be selected.
    pub fn selected(self, msg: impl Into<String>) -> Self {
        self.rule(|v| v.is_some(), msg)
    }

    /// Require the selected value to be `expected`.
    pub fn selected_value(self, expected: T, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.as_ref() == Some(&expected), msg)
    }

    /// Reject a specific value.
    pub fn not_value(self, rejected: T, msg: impl Into<String>) -> Self {
        self.rule(move |v| v.as_ref() != Some(&rejected), msg)
    }
}

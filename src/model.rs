//! Declarative defaults and validation.
//!
//! A [`Model`] runs twice during initialization: `set_defaults` before the file
//! and environment layers, so it only fills what the factory left at zero, and
//! `validate` after every layer has been applied.

use std::fmt;

use thiserror::Error;

use crate::error::ConfigError;

/// Fills zero-valued fields and validates the final object.
pub trait Model<T>: Send + Sync {
    fn set_defaults(&self, config: &mut T) -> Result<(), ConfigError>;
    fn validate(&self, config: &T) -> Result<(), ValidationError>;
}

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every rule that failed, in the order the rules were declared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", join_issues(.issues))]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

type DefaultFn<T> = Box<dyn Fn(&mut T) -> Result<(), String> + Send + Sync>;
type CheckFn<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// A [`Model`] assembled from per-field rules.
///
/// ```ignore
/// let rules = Rules::new()
///     .default_value("port", |c: &mut AppConfig| &mut c.port, 8080)
///     .check("name", |c: &AppConfig| !c.name.is_empty(), "must not be empty");
/// ```
pub struct Rules<T> {
    defaults: Vec<(String, DefaultFn<T>)>,
    checks: Vec<(String, String, CheckFn<T>)>,
}

impl<T> Default for Rules<T> {
    fn default() -> Self {
        Self {
            defaults: Vec::new(),
            checks: Vec::new(),
        }
    }
}

impl<T> Rules<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field to `value` when it still equals its type's default.
    pub fn default_value<V, A>(mut self, field: &str, accessor: A, value: V) -> Self
    where
        V: Default + PartialEq + Clone + Send + Sync + 'static,
        A: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.defaults.push((
            field.to_string(),
            Box::new(move |config| {
                let slot = accessor(config);
                if *slot == V::default() {
                    *slot = value.clone();
                }
                Ok(())
            }),
        ));
        self
    }

    /// Run an arbitrary, possibly failing, default step.
    pub fn default_with<F>(mut self, field: &str, fill: F) -> Self
    where
        F: Fn(&mut T) -> Result<(), String> + Send + Sync + 'static,
    {
        self.defaults.push((field.to_string(), Box::new(fill)));
        self
    }

    /// Require `predicate` to hold after all layers are applied.
    pub fn check<P>(mut self, field: &str, predicate: P, message: &str) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.checks
            .push((field.to_string(), message.to_string(), Box::new(predicate)));
        self
    }
}

impl<T> Model<T> for Rules<T> {
    fn set_defaults(&self, config: &mut T) -> Result<(), ConfigError> {
        for (field, fill) in &self.defaults {
            fill(config).map_err(|reason| ConfigError::Defaults {
                field: field.clone(),
                reason,
            })?;
        }
        Ok(())
    }

    fn validate(&self, config: &T) -> Result<(), ValidationError> {
        let issues: Vec<FieldIssue> = self
            .checks
            .iter()
            .filter(|(_, _, predicate)| !predicate(config))
            .map(|(field, message, _)| FieldIssue::new(field.as_str(), message.as_str()))
            .collect();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues))
        }
    }
}

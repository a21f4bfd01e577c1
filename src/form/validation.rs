use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use regex::Regex;
use rust_decimal::Decimal;

use super::controller::{ErrorMessage, FieldKey, FormController, FormResult, write_lock};

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;
}

/// What the rule engine needs to know about a field value.
pub trait FieldValue {
    /// A blank value fails `Required` and skips every other rule otherwise.
    fn is_blank(&self) -> bool;

    /// Text used by the length and pattern rules.
    fn to_text(&self) -> Cow<'_, str>;
}

impl FieldValue for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }

    fn to_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl<V: FieldValue> FieldValue for Option<V> {
    fn is_blank(&self) -> bool {
        self.as_ref().is_none_or(|value| value.is_blank())
    }

    fn to_text(&self) -> Cow<'_, str> {
        match self {
            Some(value) => value.to_text(),
            None => Cow::Borrowed(""),
        }
    }
}

impl FieldValue for bool {
    fn is_blank(&self) -> bool {
        !*self
    }

    fn to_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(if *self { "true" } else { "false" })
    }
}

impl FieldValue for Decimal {
    fn is_blank(&self) -> bool {
        false
    }

    fn to_text(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}

macro_rules! integer_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn is_blank(&self) -> bool {
                    false
                }

                fn to_text(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

integer_field_value!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

macro_rules! float_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn is_blank(&self) -> bool {
                    self.is_nan()
                }

                fn to_text(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

float_field_value!(f32, f64);

pub type Predicate<V> = Arc<dyn Fn(&V) -> bool + Send + Sync>;

pub enum Rule<V> {
    Required { message: ErrorMessage },
    MinLength { min: usize, message: ErrorMessage },
    MaxLength { max: usize, message: ErrorMessage },
    Pattern { regex: Regex, message: ErrorMessage },
    Custom { predicate: Predicate<V>, message: ErrorMessage },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    Pattern,
    Custom,
}

impl RuleKind {
    /// Evaluation order, independent of declaration order.
    pub const ORDER: [RuleKind; 5] = [
        RuleKind::Required,
        RuleKind::MinLength,
        RuleKind::MaxLength,
        RuleKind::Pattern,
        RuleKind::Custom,
    ];
}

impl<V> Rule<V> {
    pub fn required(message: impl Into<ErrorMessage>) -> Self {
        Self::Required {
            message: message.into(),
        }
    }

    pub fn min_length(min: usize, message: impl Into<ErrorMessage>) -> Self {
        Self::MinLength {
            min,
            message: message.into(),
        }
    }

    pub fn max_length(max: usize, message: impl Into<ErrorMessage>) -> Self {
        Self::MaxLength {
            max,
            message: message.into(),
        }
    }

    pub fn pattern(regex: Regex, message: impl Into<ErrorMessage>) -> Self {
        Self::Pattern {
            regex,
            message: message.into(),
        }
    }

    pub fn custom(
        predicate: impl Fn(&V) -> bool + Send + Sync + 'static,
        message: impl Into<ErrorMessage>,
    ) -> Self {
        Self::Custom {
            predicate: Arc::new(predicate),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Required { .. } => RuleKind::Required,
            Rule::MinLength { .. } => RuleKind::MinLength,
            Rule::MaxLength { .. } => RuleKind::MaxLength,
            Rule::Pattern { .. } => RuleKind::Pattern,
            Rule::Custom { .. } => RuleKind::Custom,
        }
    }

    pub fn message(&self) -> &ErrorMessage {
        match self {
            Rule::Required { message }
            | Rule::MinLength { message, .. }
            | Rule::MaxLength { message, .. }
            | Rule::Pattern { message, .. }
            | Rule::Custom { message, .. } => message,
        }
    }
}

impl<V: FieldValue> Rule<V> {
    /// Checks a non-blank value against this rule alone.
    fn check(&self, value: &V) -> Option<ErrorMessage> {
        let passed = match self {
            Rule::Required { .. } => true,
            Rule::MinLength { min, .. } => value.to_text().chars().count() >= *min,
            Rule::MaxLength { max, .. } => value.to_text().chars().count() <= *max,
            Rule::Pattern { regex, .. } => regex.is_match(&value.to_text()),
            Rule::Custom { predicate, .. } => predicate(value),
        };
        (!passed).then(|| self.message().clone())
    }
}

impl<V> Clone for Rule<V> {
    fn clone(&self) -> Self {
        match self {
            Rule::Required { message } => Rule::Required {
                message: message.clone(),
            },
            Rule::MinLength { min, message } => Rule::MinLength {
                min: *min,
                message: message.clone(),
            },
            Rule::MaxLength { max, message } => Rule::MaxLength {
                max: *max,
                message: message.clone(),
            },
            Rule::Pattern { regex, message } => Rule::Pattern {
                regex: regex.clone(),
                message: message.clone(),
            },
            Rule::Custom { predicate, message } => Rule::Custom {
                predicate: predicate.clone(),
                message: message.clone(),
            },
        }
    }
}

impl<V> Debug for Rule<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Required { message } => f
                .debug_struct("Required")
                .field("message", message)
                .finish(),
            Rule::MinLength { min, message } => f
                .debug_struct("MinLength")
                .field("min", min)
                .field("message", message)
                .finish(),
            Rule::MaxLength { max, message } => f
                .debug_struct("MaxLength")
                .field("max", max)
                .field("message", message)
                .finish(),
            Rule::Pattern { regex, message } => f
                .debug_struct("Pattern")
                .field("regex", &regex.as_str())
                .field("message", message)
                .finish(),
            Rule::Custom { message, .. } => f
                .debug_struct("Custom")
                .field("message", message)
                .finish_non_exhaustive(),
        }
    }
}

/// Returns the message of the first failing rule, or `None` when `value`
/// satisfies every rule.
///
/// A blank value fails only `Required`; when the field is optional the other
/// rules are not evaluated at all.
pub fn validate<V: FieldValue>(rules: &[Rule<V>], value: &V) -> Option<ErrorMessage> {
    if value.is_blank() {
        return rules
            .iter()
            .find(|rule| rule.kind() == RuleKind::Required)
            .map(|rule| rule.message().clone());
    }

    RuleKind::ORDER
        .iter()
        .flat_map(|kind| rules.iter().filter(move |rule| rule.kind() == *kind))
        .find_map(|rule| rule.check(value))
}

impl<T> FormController<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Writes `value` and re-validates that field only. The value and its
    /// error are updated under one write lock, so rule predicates must not
    /// call back into this controller.
    pub fn set_value<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let mut state = write_lock(&self.state, "writing field value")?;
        lens.set(&mut state.values, value);
        let is_dirty = lens.get(&state.values) != lens.get(self.registry.initial_values());
        if is_dirty {
            state.dirty.insert(key);
        } else {
            state.dirty.remove(&key);
        }

        let error = self.registry.validate_field(key, &state.values);
        tracing::trace!(field = %key, invalid = error.is_some(), "field value updated");
        state.record_error(key, error);
        Ok(())
    }

    pub fn set_touched<L>(&self, lens: L, touched: bool) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        write_lock(&self.state, "writing touched flag")?
            .touched
            .insert(lens.key(), touched);
        Ok(())
    }

    pub fn touch<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        self.set_touched(lens, true)
    }

    /// Re-validates every configured field, marks all of them touched and
    /// returns the refreshed `is_valid`.
    pub fn validate_all(&self) -> FormResult<bool> {
        let mut state = write_lock(&self.state, "validating form")?;
        let errors = self
            .registry
            .keys()
            .filter_map(|key| Some((key, self.registry.validate_field(key, &state.values)?)))
            .collect::<BTreeMap<_, _>>();

        state.touched = self.registry.keys().map(|key| (key, true)).collect();
        state.is_valid = errors.is_empty();
        state.errors = errors;
        tracing::debug!(
            form = %state.id,
            valid = state.is_valid,
            errors = state.errors.len(),
            "form validated"
        );
        Ok(state.is_valid)
    }
}

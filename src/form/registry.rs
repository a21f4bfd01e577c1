use std::collections::BTreeMap;
use std::sync::Arc;

use super::controller::{ErrorMessage, FieldKey};
use super::validation::{FieldLens, FieldValue, Rule, validate};

type FieldCheckFn<T> = Arc<dyn Fn(&T) -> Option<ErrorMessage> + Send + Sync>;
type FieldBlankFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
type CrossCheckFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

#[derive(Clone, Debug)]
pub struct FieldConfig<V> {
    pub initial_value: V,
    pub rules: Vec<Rule<V>>,
}

impl<V> FieldConfig<V> {
    pub fn new(initial_value: V) -> Self {
        Self {
            initial_value,
            rules: Vec::new(),
        }
    }

    pub fn rule(mut self, rule: Rule<V>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule<V>>) -> Self {
        self.rules.extend(rules);
        self
    }
}

impl<V: Default> Default for FieldConfig<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

struct FieldEntry<T> {
    key: FieldKey,
    check: FieldCheckFn<T>,
    is_blank: FieldBlankFn<T>,
}

impl<T> Clone for FieldEntry<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            check: self.check.clone(),
            is_blank: self.is_blank.clone(),
        }
    }
}

#[derive(Clone)]
struct CrossCheck<T> {
    message: ErrorMessage,
    predicate: CrossCheckFn<T>,
}

/// Static per-form configuration: initial values and typed rules per field.
///
/// Fields are kept in registration order; registering a key twice replaces
/// the earlier configuration.
pub struct FieldRegistry<T> {
    initial: T,
    entries: Vec<FieldEntry<T>>,
    cross_checks: BTreeMap<FieldKey, Vec<CrossCheck<T>>>,
}

impl<T: Clone> Clone for FieldRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            initial: self.initial.clone(),
            entries: self.entries.clone(),
            cross_checks: self.cross_checks.clone(),
        }
    }
}

impl<T: Default + 'static> Default for FieldRegistry<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: 'static> FieldRegistry<T> {
    /// `base` supplies the initial value of every field that is not
    /// registered with its own `FieldConfig`.
    pub fn new(base: T) -> Self {
        Self {
            initial: base,
            entries: Vec::new(),
            cross_checks: BTreeMap::new(),
        }
    }

    pub fn field<L>(mut self, lens: L, config: FieldConfig<L::Value>) -> Self
    where
        L: FieldLens<T>,
        L::Value: FieldValue,
    {
        let FieldConfig {
            initial_value,
            rules,
        } = config;
        lens.set(&mut self.initial, initial_value);

        let rules: Arc<[Rule<L::Value>]> = rules.into();
        let entry = FieldEntry {
            key: lens.key(),
            check: Arc::new(move |model: &T| validate(&rules, lens.get(model))),
            is_blank: Arc::new(move |model: &T| lens.get(model).is_blank()),
        };

        match self.entries.iter_mut().find(|existing| existing.key == entry.key) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    /// Adds a check that needs other fields of the model, such as a
    /// confirmation matching its original. It runs after the field's own
    /// rules pass and is skipped while the field is blank.
    ///
    /// A field without its own `FieldConfig` is registered with no rules and
    /// keeps its current initial value.
    pub fn cross_check<L>(
        mut self,
        lens: L,
        message: impl Into<ErrorMessage>,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self
    where
        L: FieldLens<T>,
        L::Value: FieldValue,
    {
        if !self.contains(lens.key()) {
            self.entries.push(FieldEntry {
                key: lens.key(),
                check: Arc::new(|_: &T| None),
                is_blank: Arc::new(move |model: &T| lens.get(model).is_blank()),
            });
        }
        self.cross_checks
            .entry(lens.key())
            .or_default()
            .push(CrossCheck {
                message: message.into(),
                predicate: Arc::new(predicate),
            });
        self
    }

    pub fn initial_values(&self) -> &T {
        &self.initial
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.entries.iter().map(|entry| entry.key)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.entries.iter().any(|entry| entry.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Error for one field of `model`; unregistered fields never fail.
    pub fn validate_field(&self, key: FieldKey, model: &T) -> Option<ErrorMessage> {
        let entry = self.entries.iter().find(|entry| entry.key == key)?;
        if let Some(error) = (entry.check)(model) {
            return Some(error);
        }
        if (entry.is_blank)(model) {
            return None;
        }
        self.cross_checks
            .get(&key)?
            .iter()
            .find(|check| !(check.predicate)(model))
            .map(|check| check.message.clone())
    }
}

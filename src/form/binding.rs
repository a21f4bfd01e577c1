use std::str::FromStr;
use std::sync::Arc;

use super::controller::{ErrorMessage, FieldKey, FormController, FormResult, read_lock};
use super::validation::FieldLens;

pub type ChangeHandler<V> = Arc<dyn Fn(V) + Send + Sync>;
pub type BlurHandler = Arc<dyn Fn() + Send + Sync>;

/// Everything an input control needs to render and edit one field.
///
/// `error` is only populated once the field has been touched. Handlers hold a
/// clone of the controller and drop lock errors, since input callbacks have no
/// caller to report to.
pub struct FieldBinding<V> {
    pub key: FieldKey,
    pub value: V,
    pub error: Option<ErrorMessage>,
    pub on_change: ChangeHandler<V>,
    pub on_blur: BlurHandler,
}

impl<V> FieldBinding<V> {
    pub fn change(&self, value: V) {
        (self.on_change)(value)
    }

    pub fn blur(&self) {
        (self.on_blur)()
    }
}

impl<V: Clone> Clone for FieldBinding<V> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            value: self.value.clone(),
            error: self.error.clone(),
            on_change: self.on_change.clone(),
            on_blur: self.on_blur.clone(),
        }
    }
}

impl<T> FormController<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn field_error_for_display<L>(&self, lens: L) -> FormResult<Option<ErrorMessage>>
    where
        L: FieldLens<T>,
    {
        self.display_error_message(lens.key())
    }

    pub fn bind<L>(&self, lens: L) -> FormResult<FieldBinding<L::Value>>
    where
        L: FieldLens<T>,
    {
        let controller = self.clone();
        let on_change: ChangeHandler<L::Value> =
            Arc::new(move |next| drop(controller.set_value(lens, next)));
        self.bind_with(lens, on_change)
    }

    /// Binds a typed field to a text control. Input that does not parse as
    /// `L::Value` is ignored and the field keeps its last valid value.
    pub fn bind_parsed<L>(&self, lens: L) -> FormResult<FieldBinding<String>>
    where
        L: FieldLens<T>,
        L::Value: FromStr + ToString,
    {
        let controller = self.clone();
        let on_change: ChangeHandler<String> = Arc::new(move |next: String| {
            if let Ok(parsed) = next.trim().parse::<L::Value>() {
                drop(controller.set_value(lens, parsed));
            }
        });
        let binding = self.bind_with(lens, Arc::new(|_: L::Value| {}))?;
        Ok(FieldBinding {
            key: binding.key,
            value: binding.value.to_string(),
            error: binding.error,
            on_change,
            on_blur: binding.on_blur,
        })
    }

    fn bind_with<L>(
        &self,
        lens: L,
        on_change: ChangeHandler<L::Value>,
    ) -> FormResult<FieldBinding<L::Value>>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let value = self.value(lens)?;
        let error = self.display_error_message(key)?;
        let controller = self.clone();
        Ok(FieldBinding {
            key,
            value,
            error,
            on_change,
            on_blur: Arc::new(move || drop(controller.touch(lens))),
        })
    }

    fn display_error_message(&self, key: FieldKey) -> FormResult<Option<ErrorMessage>> {
        let state = read_lock(&self.state, "reading display error message")?;
        if !state.touched.get(&key).copied().unwrap_or(false) {
            return Ok(None);
        }
        Ok(state.errors.get(&key).cloned())
    }
}

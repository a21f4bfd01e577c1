use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::diagnostics::{DiagnosticSink, TracingDiagnostics};
use super::registry::FieldRegistry;
use super::validation::FieldLens;

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

impl Display for FormId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "form-{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Human-readable validation message attached to a rule.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ErrorMessage(Arc<str>);

impl ErrorMessage {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrorMessage {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for ErrorMessage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ErrorMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ErrorMessage {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for ErrorMessage {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl PartialEq<str> for ErrorMessage {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ErrorMessage {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
    #[error("invalid pattern for field {field}: {reason}")]
    InvalidPattern { field: String, reason: String },
    #[error("failed to read rule configuration: {0}")]
    Config(String),
}

pub type FormResult<T> = Result<T, FormError>;

#[derive(Clone, Debug)]
pub struct FormSnapshot<T> {
    pub form_id: FormId,
    pub values: T,
    pub errors: BTreeMap<FieldKey, ErrorMessage>,
    pub touched: BTreeMap<FieldKey, bool>,
    pub dirty: BTreeSet<FieldKey>,
    pub is_valid: bool,
    pub is_submitting: bool,
    pub submit_count: u32,
}

impl<T> FormSnapshot<T> {
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn is_touched(&self, key: FieldKey) -> bool {
        self.touched.get(&key).copied().unwrap_or(false)
    }

    pub fn error(&self, key: FieldKey) -> Option<&ErrorMessage> {
        self.errors.get(&key)
    }
}

pub(super) struct FormState<T> {
    pub(super) id: FormId,
    pub(super) values: T,
    pub(super) errors: BTreeMap<FieldKey, ErrorMessage>,
    pub(super) touched: BTreeMap<FieldKey, bool>,
    pub(super) dirty: BTreeSet<FieldKey>,
    pub(super) is_valid: bool,
    pub(super) is_submitting: bool,
    pub(super) submit_count: u32,
}

impl<T: Clone> FormState<T> {
    fn pristine(id: FormId, values: T) -> Self {
        Self {
            id,
            values,
            errors: BTreeMap::new(),
            touched: BTreeMap::new(),
            dirty: BTreeSet::new(),
            is_valid: false,
            is_submitting: false,
            submit_count: 0,
        }
    }

    pub(super) fn record_error(&mut self, key: FieldKey, error: Option<ErrorMessage>) {
        match error {
            Some(message) => {
                self.errors.insert(key, message);
            }
            None => {
                self.errors.remove(&key);
            }
        }
    }
}

/// Form state container shared between the form owner and its field bindings.
///
/// `is_valid` is refreshed only by [`FormController::validate_all`] (and
/// cleared by [`FormController::reset`]); `set_value` recomputes the edited
/// field's error and nothing else, so `is_valid` can be stale between full
/// validation passes.
#[derive(Clone)]
pub struct FormController<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(super) registry: Arc<FieldRegistry<T>>,
    pub(super) state: Arc<RwLock<FormState<T>>>,
    pub(super) diagnostics: Arc<dyn DiagnosticSink>,
}

impl<T> FormController<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(registry: FieldRegistry<T>) -> Self {
        let initial = registry.initial_values().clone();
        Self {
            registry: Arc::new(registry),
            state: Arc::new(RwLock::new(FormState::pristine(FormId::next(), initial))),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    pub fn with_diagnostics(mut self, sink: impl DiagnosticSink) -> Self {
        self.diagnostics = Arc::new(sink);
        self
    }

    pub fn registry(&self) -> &FieldRegistry<T> {
        &self.registry
    }

    pub fn form_id(&self) -> FormResult<FormId> {
        Ok(read_lock(&self.state, "reading form id")?.id)
    }

    pub fn reset(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "resetting form")?;
        let id = state.id;
        *state = FormState::pristine(id, self.registry.initial_values().clone());
        Ok(())
    }

    /// Validates every field and, when the form is valid, awaits `on_submit`
    /// with a copy of the current values.
    ///
    /// An invalid form returns without calling `on_submit`. An `Err` from the
    /// callback goes to the diagnostic sink and is not returned; the only
    /// errors surfaced here are lock failures.
    pub async fn submit<F, Fut, E>(&self, on_submit: F) -> FormResult<()>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        if !self.validate_all()? {
            tracing::debug!(form = %self.form_id()?, "submit skipped, form is invalid");
            return Ok(());
        }

        let (form_id, values) = {
            let mut state = write_lock(&self.state, "entering submitting state")?;
            state.is_submitting = true;
            state.submit_count = state.submit_count.saturating_add(1);
            (state.id, state.values.clone())
        };
        let _submitting = SubmittingGuard { state: &self.state };

        if let Err(error) = on_submit(values).await {
            self.diagnostics.submit_failed(form_id, &error);
        }
        Ok(())
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<T>> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            form_id: state.id,
            values: state.values.clone(),
            errors: state.errors.clone(),
            touched: state.touched.clone(),
            dirty: state.dirty.clone(),
            is_valid: state.is_valid,
            is_submitting: state.is_submitting,
            submit_count: state.submit_count,
        })
    }

    pub fn values(&self) -> FormResult<T> {
        Ok(read_lock(&self.state, "reading form values")?.values.clone())
    }

    pub fn value<L>(&self, lens: L) -> FormResult<L::Value>
    where
        L: FieldLens<T>,
    {
        let state = read_lock(&self.state, "reading field value")?;
        Ok(lens.get(&state.values).clone())
    }

    pub fn is_valid(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "reading validity")?.is_valid)
    }

    pub fn is_submitting(&self) -> FormResult<bool> {
        Ok(read_lock(&self.state, "reading submitting flag")?.is_submitting)
    }

    pub fn is_dirty(&self) -> FormResult<bool> {
        Ok(!read_lock(&self.state, "reading dirty fields")?.dirty.is_empty())
    }

    pub fn field_error<L>(&self, lens: L) -> FormResult<Option<ErrorMessage>>
    where
        L: FieldLens<T>,
    {
        Ok(read_lock(&self.state, "reading field error")?
            .errors
            .get(&lens.key())
            .cloned())
    }

    pub fn is_touched<L>(&self, lens: L) -> FormResult<bool>
    where
        L: FieldLens<T>,
    {
        Ok(read_lock(&self.state, "reading touched flag")?
            .touched
            .get(&lens.key())
            .copied()
            .unwrap_or(false))
    }
}

struct SubmittingGuard<'a, T> {
    state: &'a RwLock<FormState<T>>,
}

impl<T> Drop for SubmittingGuard<'_, T> {
    fn drop(&mut self) {
        let mut state = match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.is_submitting = false;
    }
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}

use std::fmt::Display;

use super::controller::FormId;

/// Receives submission failures that `FormController::submit` swallows.
pub trait DiagnosticSink: Send + Sync + 'static {
    fn submit_failed(&self, form_id: FormId, error: &dyn Display);
}

/// Default sink: reports through `tracing` at error level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn submit_failed(&self, form_id: FormId, error: &dyn Display) {
        tracing::error!(form = %form_id, error = %error, "form submission failed");
    }
}

impl<F> DiagnosticSink for F
where
    F: Fn(FormId, &dyn Display) + Send + Sync + 'static,
{
    fn submit_failed(&self, form_id: FormId, error: &dyn Display) {
        (self)(form_id, error)
    }
}

mod binding;
mod config;
mod controller;
mod diagnostics;
mod registry;
mod validation;


pub use binding::{BlurHandler, ChangeHandler, FieldBinding};
pub use config::{RuleSpec, RulesConfig};
pub use controller::{
    ErrorMessage, FieldKey, FormController, FormError, FormId, FormResult, FormSnapshot,
};
pub use diagnostics::{DiagnosticSink, TracingDiagnostics};
pub use registry::{FieldConfig, FieldRegistry};
pub use tripform_derive::FormModel;
pub use validation::{FieldLens, FieldValue, FormModel, Predicate, Rule, RuleKind, validate};

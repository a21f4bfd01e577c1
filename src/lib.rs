pub mod form;
pub mod forms;
pub mod itinerary;
pub mod session;

pub use form::{FieldRegistry, FormController, FormError, FormResult};

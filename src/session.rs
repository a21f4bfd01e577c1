use std::convert::Infallible;
use std::sync::{Arc, RwLock};

use crate::itinerary::{TripItinerary, User};

/// Persistence for the auth token handed out at login.
pub trait TokenStore: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    fn store(&self, token: &str) -> Result<(), Self::Error>;
    fn load(&self) -> Result<Option<String>, Self::Error>;
    fn remove(&self) -> Result<(), Self::Error>;
}

#[derive(Clone, Default)]
pub struct InMemoryTokenStore {
    token: Arc<RwLock<Option<String>>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for InMemoryTokenStore {
    type Error = Infallible;

    fn store(&self, token: &str) -> Result<(), Self::Error> {
        let mut state = match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *state = Some(token.to_string());
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, Self::Error> {
        let state = match self.token.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(state.clone())
    }

    fn remove(&self) -> Result<(), Self::Error> {
        let mut state = match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *state = None;
        Ok(())
    }
}

/// Signed-in user and trip history, owned by the application shell and
/// handed to screens that need it.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    user: Option<User>,
    is_loading: bool,
    current_trip: Option<TripItinerary>,
    saved_trips: Vec<TripItinerary>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn current_trip(&self) -> Option<&TripItinerary> {
        self.current_trip.as_ref()
    }

    pub fn saved_trips(&self) -> &[TripItinerary] {
        &self.saved_trips
    }

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn clear_user(&mut self) {
        self.user = None;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn set_current_trip(&mut self, trip: TripItinerary) {
        self.current_trip = Some(trip);
    }

    pub fn clear_current_trip(&mut self) {
        self.current_trip = None;
    }

    pub fn add_saved_trip(&mut self, trip: TripItinerary) {
        self.saved_trips.push(trip);
    }

    pub fn set_saved_trips(&mut self, trips: Vec<TripItinerary>) {
        self.saved_trips = trips;
    }

    /// Signs `user` in. A token that fails to persist is logged and the
    /// session still starts.
    pub fn login<S: TokenStore>(&mut self, user: User, tokens: &S) {
        if let Some(token) = user.token.as_deref()
            && let Err(error) = tokens.store(token)
        {
            tracing::warn!(%error, user = %user.id, "failed to persist auth token");
        }
        tracing::info!(user = %user.id, "signed in");
        self.user = Some(user);
    }

    pub fn logout<S: TokenStore>(&mut self, tokens: &S) {
        if let Err(error) = tokens.remove() {
            tracing::warn!(%error, "failed to remove auth token");
        }
        self.user = None;
        self.current_trip = None;
        self.saved_trips.clear();
    }
}

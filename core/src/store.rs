//! Observable CRUD state for the movie catalog.
//!
//! # Design
//! `MoviesStore` orchestrates [`ApiClient`] operations and mirrors their
//! outcome into one observable [`MoviesState`] for presentation layers.
//! Its error contract is asymmetric with the client on purpose: client
//! operations return `Err`, the store absorbs the failure into
//! `state.error` and reports mutations as a plain success boolean.
//! Callers that need the status or payload details of a failure must use
//! the client directly.
//!
//! The store adds no mutual exclusion. Operations are synchronous, so a
//! single caller runs them strictly one after another; two threads
//! mutating through clones of the same store race, and the last one to
//! finish wins the `records`/`error`/`mutating` fields.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::observable::{Observable, Subscription};
use crate::types::{Movie, MoviePayload};

/// Snapshot of the catalog state, as consumed by UI layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoviesState {
    /// Client-side cache of the server list, in server order; created
    /// movies are appended, updated ones replaced in place.
    pub movies: Vec<Movie>,
    /// True only while the list fetch is in flight.
    pub loading: bool,
    /// True only while a create, update or delete is in flight.
    pub mutating: bool,
    /// Message of the most recent failed operation; cleared when the next
    /// operation starts.
    pub error: Option<String>,
}

/// Observable store driving the movie catalog UI.
#[derive(Clone)]
pub struct MoviesStore {
    state: Observable<MoviesState>,
    api: ApiClient,
}

impl MoviesStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            state: Observable::new(MoviesState::default()),
            api,
        }
    }

    /// Snapshot of the full state.
    pub fn state(&self) -> MoviesState {
        self.state.get()
    }

    pub fn movies(&self) -> Vec<Movie> {
        self.state.get().movies
    }

    pub fn is_loading(&self) -> bool {
        self.state.get().loading
    }

    pub fn is_mutating(&self) -> bool {
        self.state.get().mutating
    }

    pub fn error(&self) -> Option<String> {
        self.state.get().error
    }

    /// Observe state changes. Fires immediately with the current state,
    /// then after every transition.
    pub fn subscribe(
        &self,
        callback: impl Fn(&MoviesState) + Send + Sync + 'static,
    ) -> Subscription<MoviesState> {
        self.state.subscribe(callback)
    }

    /// Fetch the catalog and replace the cached list wholesale.
    ///
    /// A failure lands in `state.error` and keeps the previous list.
    pub fn load_movies(&self) {
        self.state.update(|state| {
            state.loading = true;
            state.error = None;
        });
        match self.api.list_movies() {
            Ok(movies) => self.state.update(|state| {
                state.movies = movies;
                state.loading = false;
            }),
            Err(err) => {
                tracing::warn!(error = %err, "loading movies failed");
                self.state.update(|state| {
                    state.error = Some(err.to_string());
                    state.loading = false;
                });
            }
        }
    }

    /// Create a movie and append it to the cached list.
    pub fn create_movie(&self, payload: &MoviePayload) -> bool {
        self.begin_mutation();
        match self.api.create_movie(payload) {
            Ok(created) => self.finish_mutation(|state| state.movies.push(created)),
            Err(err) => self.fail_mutation("creating movie", err),
        }
    }

    /// Update a movie and replace its cached entry in place; the rest of
    /// the list keeps its order. The entry to replace is the one with the
    /// requested `id`, whatever id the server echoes back.
    pub fn update_movie(&self, id: &str, payload: &MoviePayload) -> bool {
        self.begin_mutation();
        match self.api.update_movie(id, payload) {
            Ok(updated) => self.finish_mutation(move |state| {
                if let Some(entry) = state.movies.iter_mut().find(|movie| movie.id == id) {
                    *entry = updated;
                }
            }),
            Err(err) => self.fail_mutation("updating movie", err),
        }
    }

    /// Delete a movie and drop it from the cached list.
    pub fn delete_movie(&self, id: &str) -> bool {
        self.begin_mutation();
        match self.api.delete_movie(id) {
            Ok(()) => self.finish_mutation(|state| state.movies.retain(|movie| movie.id != id)),
            Err(err) => self.fail_mutation("deleting movie", err),
        }
    }

    /// Return the store to its initial state.
    pub fn reset(&self) {
        self.state.set(MoviesState::default());
    }

    /// Clear only the error field, leaving the list and flags untouched.
    pub fn clear_error(&self) {
        self.state.update(|state| state.error = None);
    }

    fn begin_mutation(&self) {
        self.state.update(|state| {
            state.mutating = true;
            state.error = None;
        });
    }

    fn finish_mutation(&self, apply: impl FnOnce(&mut MoviesState)) -> bool {
        self.state.update(|state| {
            apply(state);
            state.mutating = false;
        });
        true
    }

    fn fail_mutation(&self, action: &str, err: ApiError) -> bool {
        tracing::warn!(error = %err, "{} failed", action);
        self.state.update(|state| {
            state.error = Some(err.to_string());
            state.mutating = false;
        });
        false
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;
    use crate::testutil::{
        empty_response, json_response, sample_movie, test_client, MockTransport,
    };

    fn scripted() -> (Arc<MockTransport>, MoviesStore) {
        let transport = Arc::new(MockTransport::new());
        let store = MoviesStore::new(test_client(Arc::clone(&transport)));
        (transport, store)
    }

    fn movie_list(movies: &[Movie]) -> serde_json::Value {
        serde_json::to_value(movies).unwrap()
    }

    #[test]
    fn create_success_appends_and_reports_true() {
        let (transport, store) = scripted();
        transport.expect(json_response(
            201,
            json!({"id": "1", "title": "A", "director": "B", "year": 2000}),
        ));

        let ok = store.create_movie(&MoviePayload {
            title: "A".to_string(),
            director: "B".to_string(),
            poster_url: None,
            year: 2000,
        });

        assert!(ok);
        let state = store.state();
        let expected = Movie {
            id: "1".to_string(),
            title: "A".to_string(),
            director: "B".to_string(),
            poster_url: None,
            year: Some(2000),
            created_at: None,
            updated_at: None,
        };
        assert_eq!(state.movies, vec![expected]);
        assert!(!state.mutating);
        assert_eq!(state.error, None);
    }

    #[test]
    fn create_failure_keeps_records_and_reports_false() {
        let (transport, store) = scripted();
        let existing = sample_movie("m1", "Amélie");
        transport.expect(json_response(200, movie_list(&[existing.clone()])));
        store.load_movies();

        transport.expect(json_response(400, json!({"error": "El email ya existe"})));
        let ok = store.create_movie(&MoviePayload {
            title: "A".to_string(),
            director: "B".to_string(),
            poster_url: None,
            year: 2000,
        });

        assert!(!ok);
        let state = store.state();
        assert_eq!(state.movies, vec![existing]);
        assert!(!state.mutating);
        assert_eq!(state.error.as_deref(), Some("El email ya existe"));
    }

    #[test]
    fn load_movies_replaces_the_list_wholesale() {
        let (transport, store) = scripted();
        let first = [sample_movie("m1", "Amélie"), sample_movie("m2", "Alien")];
        transport.expect(json_response(200, movie_list(&first)));
        store.load_movies();
        assert_eq!(store.movies().len(), 2);

        let second = [sample_movie("m3", "Brazil")];
        transport.expect(json_response(200, movie_list(&second)));
        store.load_movies();

        assert_eq!(store.movies(), second.to_vec());
        assert!(!store.is_loading());
        assert_eq!(store.error(), None);
    }

    #[test]
    fn load_failure_keeps_the_previous_list() {
        let (transport, store) = scripted();
        let existing = sample_movie("m1", "Amélie");
        transport.expect(json_response(200, movie_list(&[existing.clone()])));
        store.load_movies();

        transport.expect_transport_error("connection refused");
        store.load_movies();

        let state = store.state();
        assert_eq!(state.movies, vec![existing]);
        assert!(!state.loading);
        assert_eq!(
            state.error.as_deref(),
            Some("No se pudo conectar con el servidor.")
        );
    }

    #[test]
    fn update_replaces_the_matching_movie_in_place() {
        let (transport, store) = scripted();
        let movies = [sample_movie("m1", "Amélie"), sample_movie("m2", "Alien")];
        transport.expect(json_response(200, movie_list(&movies)));
        store.load_movies();

        let mut renamed = sample_movie("m1", "Amélie (remaster)");
        renamed.year = Some(2011);
        transport.expect(json_response(200, serde_json::to_value(&renamed).unwrap()));

        let ok = store.update_movie(
            "m1",
            &MoviePayload {
                title: renamed.title.clone(),
                director: renamed.director.clone(),
                poster_url: None,
                year: 2011,
            },
        );

        assert!(ok);
        assert_eq!(store.movies(), vec![renamed, movies[1].clone()]);
    }

    #[test]
    fn update_keys_the_replacement_on_the_requested_id() {
        let (transport, store) = scripted();
        let movies = [sample_movie("m1", "Amélie"), sample_movie("m2", "Alien")];
        transport.expect(json_response(200, movie_list(&movies)));
        store.load_movies();

        // A server that reassigns ids on update: the requested entry is
        // still the one replaced.
        let reissued = sample_movie("m9", "Amélie (remaster)");
        transport.expect(json_response(200, serde_json::to_value(&reissued).unwrap()));
        let ok = store.update_movie(
            "m1",
            &MoviePayload {
                title: reissued.title.clone(),
                director: reissued.director.clone(),
                poster_url: None,
                year: 1999,
            },
        );

        assert!(ok);
        assert_eq!(store.movies(), vec![reissued, movies[1].clone()]);
    }

    #[test]
    fn update_of_unknown_id_leaves_the_list_alone() {
        let (transport, store) = scripted();
        let movies = [sample_movie("m1", "Amélie")];
        transport.expect(json_response(200, movie_list(&movies)));
        store.load_movies();

        let stray = sample_movie("ghost", "Nobody");
        transport.expect(json_response(200, serde_json::to_value(&stray).unwrap()));
        let ok = store.update_movie(
            "ghost",
            &MoviePayload {
                title: stray.title.clone(),
                director: stray.director.clone(),
                poster_url: None,
                year: 1999,
            },
        );

        assert!(ok, "the server accepted the update");
        assert_eq!(store.movies(), movies.to_vec());
    }

    #[test]
    fn delete_removes_the_matching_movie() {
        let (transport, store) = scripted();
        let movies = [sample_movie("m1", "Amélie"), sample_movie("m2", "Alien")];
        transport.expect(json_response(200, movie_list(&movies)));
        store.load_movies();

        transport.expect(empty_response(204));
        let ok = store.delete_movie("m1");

        assert!(ok);
        assert_eq!(store.movies(), vec![movies[1].clone()]);
        assert_eq!(store.error(), None);
    }

    #[test]
    fn busy_flags_bracket_each_operation() {
        let (transport, store) = scripted();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = store.subscribe(move |state| sink.lock().unwrap().push(state.clone()));

        transport.expect(json_response(200, json!([])));
        store.load_movies();
        transport.expect(json_response(
            201,
            json!({"id": "1", "title": "A", "director": "B", "year": 2000}),
        ));
        store.create_movie(&MoviePayload {
            title: "A".to_string(),
            director: "B".to_string(),
            poster_url: None,
            year: 2000,
        });

        let states = seen.lock().unwrap();
        let flags: Vec<(bool, bool)> = states
            .iter()
            .map(|state| (state.loading, state.mutating))
            .collect();
        assert_eq!(
            flags,
            vec![
                (false, false), // immediate emission of the initial state
                (true, false),  // list fetch in flight
                (false, false),
                (false, true), // create in flight
                (false, false),
            ]
        );
    }

    #[test]
    fn error_is_cleared_when_the_next_operation_starts() {
        let (transport, store) = scripted();
        transport.expect_transport_error("connection refused");
        store.load_movies();
        assert!(store.error().is_some());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = store.subscribe(move |state| sink.lock().unwrap().push(state.clone()));

        transport.expect(json_response(200, json!([])));
        store.load_movies();

        let states = seen.lock().unwrap();
        // states[1] is the transition into the second load.
        assert!(states[1].loading);
        assert_eq!(states[1].error, None);
        assert_eq!(store.error(), None);
    }

    #[test]
    fn reset_restores_the_initial_state() {
        let (transport, store) = scripted();
        transport.expect(json_response(200, movie_list(&[sample_movie("m1", "Amélie")])));
        store.load_movies();
        transport.expect(json_response(400, json!({"error": "El email ya existe"})));
        store.create_movie(&MoviePayload {
            title: "A".to_string(),
            director: "B".to_string(),
            poster_url: None,
            year: 2000,
        });

        store.reset();

        assert_eq!(store.state(), MoviesState::default());
    }

    #[test]
    fn clear_error_leaves_the_rest_of_the_state() {
        let (transport, store) = scripted();
        transport.expect(json_response(200, movie_list(&[sample_movie("m1", "Amélie")])));
        store.load_movies();
        transport.expect(json_response(404, json!({"error": "Película no encontrada"})));
        assert!(!store.delete_movie("m1"));
        assert_eq!(store.error().as_deref(), Some("Película no encontrada"));

        store.clear_error();

        let state = store.state();
        assert_eq!(state.error, None);
        assert_eq!(state.movies.len(), 1, "failed delete must not drop the entry");
        assert!(!state.loading);
        assert!(!state.mutating);
    }
}

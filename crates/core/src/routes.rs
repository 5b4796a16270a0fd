//! Route table and navigation guards.
//!
//! Guards are pure functions of the current authentication state, evaluated
//! per navigation. No flag is stored anywhere; the decision is recomputed
//! from session presence every time.

/// Canonical application routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
	/// Marketing home, public.
	Home,
	/// Sign-in entry point.
	Login,
	/// Protected dashboard shell.
	Dashboard,
}

impl Route {
	/// Maps a path onto its route. Unknown paths fall back to home.
	pub fn from_path(path: &str) -> Route {
		match path {
			"/" | "/sign-in" => Route::Home,
			"/login" => Route::Login,
			"/dashboard" => Route::Dashboard,
			_ => Route::Home,
		}
	}

	pub fn path(&self) -> &'static str {
		match self {
			Route::Home => "/",
			Route::Login => "/login",
			Route::Dashboard => "/dashboard",
		}
	}
}

/// Where a navigation actually lands given the current state: the protected
/// view redirects to sign-in when unauthenticated, and the sign-in entry
/// redirects to the protected view when already authenticated.
pub fn resolve(requested: Route, authenticated: bool) -> Route {
	match (requested, authenticated) {
		(Route::Dashboard, false) => Route::Login,
		(Route::Login, true) => Route::Dashboard,
		(route, _) => route,
	}
}

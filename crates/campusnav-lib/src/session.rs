//! Navigation session state shared by every screen of a route-planning flow.
//!
//! [`NavigationSession`] is an owned value: hand out `&mut` access to whichever
//! component is currently handling input. All mutators are synchronous state
//! transitions and never fail; out-of-range route indices are clamped.
//!
//! The currently rendered route is always read through
//! [`NavigationSession::route_data`], which derives it from `routes` and
//! `selected_route_index` on every call.
//!
//! # Stale completions
//!
//! The plain setters (`set_routes`, `set_error`, `set_loading`) accept writes
//! from any caller, including a directions request that was superseded by a
//! newer one. Callers that want ordering protection use
//! [`NavigationSession::begin_request`] / [`NavigationSession::complete_request`],
//! which discard completions carrying an outdated [`RequestToken`].

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, warn};

use crate::geometry::Point;
use crate::route::{RouteData, TimeMode, TravelMode};

/// One end of a trip: building, position, display label and optional room.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Endpoint {
    pub building_id: Option<String>,
    pub coords: Option<Point>,
    pub label: Option<String>,
    pub room: Option<String>,
}

impl Endpoint {
    pub fn is_set(&self) -> bool {
        self.building_id.is_some()
    }
}

/// Behavioural switches for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionConfig {
    /// When `true`, [`NavigationSession::reset_directions`] also restores the
    /// time-query mode and target time.
    pub reset_includes_time_query: bool,
}

/// Identifies one directions request issued through
/// [`NavigationSession::begin_request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// State of an in-progress or completed route-planning interaction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NavigationSession {
    #[serde(skip)]
    config: SessionConfig,
    start: Endpoint,
    destination: Endpoint,
    time_mode: TimeMode,
    target_time: Option<NaiveDateTime>,
    routes: Vec<RouteData>,
    selected_route_index: usize,
    /// Set by `set_route_data`; shadows the derived route until the next
    /// change to `routes` or the selected index.
    #[serde(skip)]
    route_override: Option<RouteData>,
    travel_mode: TravelMode,
    show_directions: bool,
    is_navigation_active: bool,
    loading: bool,
    error: Option<String>,
    #[serde(skip)]
    latest_request: u64,
}

impl NavigationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    // --- Accessors -------------------------------------------------------

    pub fn start(&self) -> &Endpoint {
        &self.start
    }

    pub fn destination(&self) -> &Endpoint {
        &self.destination
    }

    pub fn time_mode(&self) -> TimeMode {
        self.time_mode
    }

    pub fn target_time(&self) -> Option<NaiveDateTime> {
        self.target_time
    }

    pub fn routes(&self) -> &[RouteData] {
        &self.routes
    }

    pub fn selected_route_index(&self) -> usize {
        self.selected_route_index
    }

    /// The route to render: the override installed by
    /// [`set_route_data`](Self::set_route_data) if any, otherwise
    /// `routes[selected_route_index]`.
    pub fn route_data(&self) -> Option<&RouteData> {
        self.route_override
            .as_ref()
            .or_else(|| self.routes.get(self.selected_route_index))
    }

    pub fn travel_mode(&self) -> TravelMode {
        self.travel_mode
    }

    pub fn show_directions(&self) -> bool {
        self.show_directions
    }

    pub fn is_navigation_active(&self) -> bool {
        self.is_navigation_active
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // --- Trip endpoints --------------------------------------------------

    pub fn set_start_point(
        &mut self,
        building_id: impl Into<String>,
        coords: Point,
        label: impl Into<String>,
        room: Option<String>,
    ) {
        self.start = Endpoint {
            building_id: Some(building_id.into()),
            coords: Some(coords),
            label: Some(label.into()),
            room,
        };
    }

    /// Set the destination identity. Leaves the destination room and any
    /// existing routes untouched.
    pub fn set_destination(
        &mut self,
        building_id: impl Into<String>,
        coords: Point,
        label: impl Into<String>,
    ) {
        self.destination.building_id = Some(building_id.into());
        self.destination.coords = Some(coords);
        self.destination.label = Some(label.into());
    }

    pub fn set_start_room(&mut self, room: Option<String>) {
        self.start.room = room;
    }

    pub fn set_destination_room(&mut self, room: Option<String>) {
        self.destination.room = room;
    }

    /// Drop the destination and everything that depends on it.
    ///
    /// Routes and selection are cleared, the directions panel, active
    /// navigation and loading flags are switched off, the error is cleared
    /// and any in-flight request is invalidated.
    pub fn clear_destination(&mut self) {
        self.destination = Endpoint::default();
        self.clear_route_data();
        self.show_directions = false;
        self.is_navigation_active = false;
        self.loading = false;
        self.error = None;
        self.latest_request += 1;
    }

    // --- Routes ----------------------------------------------------------

    /// Replace the candidate routes, keeping the selected index when it is
    /// still in range and clamping it to the last route otherwise.
    pub fn set_routes(&mut self, routes: Vec<RouteData>) {
        let previous = self.selected_route_index;
        self.selected_route_index = if routes.is_empty() {
            0
        } else {
            previous.min(routes.len() - 1)
        };
        if !routes.is_empty() && self.selected_route_index != previous {
            debug!(
                previous,
                clamped = self.selected_route_index,
                routes = routes.len(),
                "selected route index clamped to new route list"
            );
        }

        self.routes = routes;
        self.route_override = None;
    }

    /// Select a route. Indices past the end are clamped to the last route.
    pub fn set_selected_route_index(&mut self, index: usize) {
        let clamped = match self.routes.len() {
            0 => index,
            len if index >= len => {
                warn!(index, routes = len, "route index out of range; clamping");
                len - 1
            }
            _ => index,
        };
        self.selected_route_index = clamped;
        self.route_override = None;
    }

    /// Install `route` as the rendered route without touching `routes`.
    pub fn set_route_data(&mut self, route: RouteData) {
        self.route_override = Some(route);
    }

    pub fn clear_route_data(&mut self) {
        self.routes.clear();
        self.selected_route_index = 0;
        self.route_override = None;
    }

    // --- Query parameters ------------------------------------------------

    pub fn set_travel_mode(&mut self, mode: TravelMode) {
        self.travel_mode = mode;
    }

    pub fn set_time_mode(&mut self, mode: TimeMode) {
        self.time_mode = mode;
    }

    pub fn set_target_time(&mut self, time: Option<NaiveDateTime>) {
        self.target_time = time;
    }

    // --- UI flags --------------------------------------------------------

    pub fn set_show_directions(&mut self, show: bool) {
        self.show_directions = show;
    }

    pub fn set_is_navigation_active(&mut self, active: bool) {
        self.is_navigation_active = active;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    // --- Request ordering ------------------------------------------------

    /// Mark a directions request as in flight and return its token.
    pub fn begin_request(&mut self) -> RequestToken {
        self.latest_request += 1;
        self.loading = true;
        RequestToken(self.latest_request)
    }

    /// Whether `token` belongs to the newest request.
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest_request
    }

    /// Apply the outcome of the request identified by `token`.
    ///
    /// Success installs the routes and clears the error; failure records the
    /// message. Either way `loading` is turned off. Outcomes of superseded
    /// requests are discarded and `false` is returned.
    pub fn complete_request(
        &mut self,
        token: RequestToken,
        outcome: Result<Vec<RouteData>, String>,
    ) -> bool {
        if !self.is_current(token) {
            warn!(
                token = token.0,
                latest = self.latest_request,
                "discarding completion of superseded directions request"
            );
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(routes) => {
                debug!(routes = routes.len(), "installing directions result");
                self.error = None;
                self.set_routes(routes);
            }
            Err(message) => {
                debug!(%message, "directions request failed");
                self.error = Some(message);
            }
        }
        true
    }

    // --- Reset -----------------------------------------------------------

    /// Return every field to its initial value.
    ///
    /// Time-query fields are included only when
    /// [`SessionConfig::reset_includes_time_query`] is set. Requests started
    /// before the reset can no longer complete.
    pub fn reset_directions(&mut self) {
        let time_mode = self.time_mode;
        let target_time = self.target_time;

        *self = Self {
            config: self.config,
            latest_request: self.latest_request + 1,
            ..Self::default()
        };

        if !self.config.reset_includes_time_query {
            self.time_mode = time_mode;
            self.target_time = target_time;
        }
    }
}

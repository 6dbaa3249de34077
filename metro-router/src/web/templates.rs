//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::Route;

/// Route results fragment.
#[derive(Template)]
#[template(path = "routes.html")]
pub struct RouteResultsTemplate {
    pub from: String,
    pub to: String,
    pub at: Option<String>,
    pub routes: Vec<RouteView>,
}

/// Route view model for templates.
#[derive(Debug, Clone)]
pub struct RouteView {
    pub time_taken_mins: u32,
    pub stations_travelled: usize,
    pub changes: usize,
    pub codes: String,
    pub steps: Vec<String>,
}

impl RouteView {
    pub fn from_route(route: &Route) -> Self {
        Self {
            time_taken_mins: route.time_taken_mins(),
            stations_travelled: route.stations_travelled(),
            changes: route.change_count(),
            codes: route.stop_codes().join(" → "),
            steps: route.describe(),
        }
    }

    /// "Direct", "1 change" or "N changes".
    pub fn changes_label(&self) -> String {
        match self.changes {
            0 => "Direct".to_string(),
            1 => "1 change".to_string(),
            n => format!("{n} changes"),
        }
    }
}

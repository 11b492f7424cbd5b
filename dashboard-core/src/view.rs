//! The display surface the dashboard writes into.
//!
//! A view exposes five fixed text regions, one text input and a blocking
//! notification. Front-ends implement [`DashboardView`]; [`MemoryView`] keeps
//! everything in memory and is what the terminal front-end and tests use.

use std::{collections::HashMap, fmt};

use parking_lot::Mutex;

/// Identifier of the search input region.
pub const CITY_INPUT_ID: &str = "city-input";

/// Identifier of the search trigger.
pub const SEARCH_BUTTON_ID: &str = "search-btn";

/// Display regions written by a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    City,
    Temperature,
    Description,
    Humidity,
    Wind,
}

impl Field {
    pub fn id(&self) -> &'static str {
        match self {
            Field::City => "city",
            Field::Temperature => "temp",
            Field::Description => "desc",
            Field::Humidity => "humidity",
            Field::Wind => "wind",
        }
    }

    pub const fn all() -> &'static [Field] {
        &[Field::City, Field::Temperature, Field::Description, Field::Humidity, Field::Wind]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

pub trait DashboardView: Send + Sync {
    /// Overwrite the text content of a region.
    fn set_text(&self, field: Field, text: &str);

    /// Current value of the city input; may be empty.
    fn input_value(&self) -> String;

    /// Show a blocking notification to the user.
    fn alert(&self, message: &str);
}

#[derive(Debug, Default)]
struct MemoryState {
    fields: HashMap<Field, String>,
    input: String,
    alerts: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MemoryView {
    state: Mutex<MemoryState>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&self, value: impl Into<String>) {
        self.state.lock().input = value.into();
    }

    pub fn text(&self, field: Field) -> Option<String> {
        self.state.lock().fields.get(&field).cloned()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state.lock().alerts.clone()
    }

    /// Remove and return pending alerts.
    pub fn take_alerts(&self) -> Vec<String> {
        std::mem::take(&mut self.state.lock().alerts)
    }

    pub fn is_blank(&self) -> bool {
        self.state.lock().fields.is_empty()
    }
}

impl DashboardView for MemoryView {
    fn set_text(&self, field: Field, text: &str) {
        self.state.lock().fields.insert(field, text.to_string());
    }

    fn input_value(&self) -> String {
        self.state.lock().input.clone()
    }

    fn alert(&self, message: &str) {
        self.state.lock().alerts.push(message.to_string());
    }
}

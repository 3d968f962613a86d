use crate::models::Company;

/// Maximum number of matches shown in the results panel
pub const MAX_DISPLAYED_RESULTS: usize = 10;

/// Companies whose name or ticker contains `query`, ignoring case.
///
/// Results keep directory order. An empty query matches nothing so the
/// results panel stays closed until the user types.
pub fn filter_companies(directory: &[Company], query: &str) -> Vec<Company> {
    if query.is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    directory
        .iter()
        .filter(|company| {
            company.name.to_lowercase().contains(&needle)
                || company.ticker.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Search box state, recomputed whenever the query changes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub filtered_results: Vec<Company>,
    pub results_visible: bool,
}

impl SearchState {
    /// New state for an edited query
    pub fn with_query(directory: &[Company], query: &str) -> Self {
        Self {
            query: query.to_string(),
            filtered_results: filter_companies(directory, query),
            results_visible: !query.is_empty(),
        }
    }

    /// Input regained focus: reopen the panel if there is something typed
    pub fn focused(&self) -> Self {
        Self {
            results_visible: !self.query.is_empty(),
            ..self.clone()
        }
    }

    /// Input lost focus
    pub fn blurred(&self) -> Self {
        Self {
            results_visible: false,
            ..self.clone()
        }
    }

    /// The slice the results panel renders
    pub fn displayed_results(&self) -> &[Company] {
        let end = self.filtered_results.len().min(MAX_DISPLAYED_RESULTS);
        &self.filtered_results[..end]
    }
}

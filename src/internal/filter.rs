use tracing::debug;

use crate::content::Project;

/// Reserved chip token that matches every project.
pub const FILTER_ALL: &str = "all";

/// One tag chip in the projects section. Exactly one chip is active at a
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    pub token: String,
    pub active: bool,
}

/// Visibility control for the project grid.
///
/// Chip filtering and title search are independent passes: each one
/// recomputes visibility for every project from scratch, so whichever ran
/// last fully determines what is shown. Selecting a chip does not consult
/// the search text and searching does not consult the active chip.
#[derive(Debug, Clone)]
pub struct ProjectFilter {
    chips: Vec<FilterChip>,
    visible: Vec<bool>,
    query: String,
}

impl ProjectFilter {
    /// Build the chip row. The first token starts active; by convention the
    /// content places [`FILTER_ALL`] there.
    pub fn new(tokens: &[String], project_count: usize) -> Self {
        let chips = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| FilterChip {
                token: token.clone(),
                active: i == 0,
            })
            .collect();

        Self {
            chips,
            visible: vec![true; project_count],
            query: String::new(),
        }
    }

    pub fn chips(&self) -> &[FilterChip] {
        &self.chips
    }

    pub fn active_chip(&self) -> Option<usize> {
        self.chips.iter().position(|c| c.active)
    }

    /// The search text as last applied, before trimming.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Activate the chip at `idx` and run its tag pass. Out-of-range
    /// indices are ignored.
    pub fn select_chip(&mut self, idx: usize, projects: &[Project]) {
        if idx >= self.chips.len() {
            return;
        }
        for (i, chip) in self.chips.iter_mut().enumerate() {
            chip.active = i == idx;
        }
        let token = self.chips[idx].token.clone();
        self.apply_tag_filter(&token, projects);
    }

    /// Show projects whose tech list contains `token` as a
    /// case-insensitive substring. The reserved token shows everything.
    pub fn apply_tag_filter(&mut self, token: &str, projects: &[Project]) {
        let needle = token.to_lowercase();
        self.visible = projects
            .iter()
            .map(|p| token == FILTER_ALL || p.tech.to_lowercase().contains(&needle))
            .collect();
        debug!(
            filter = token,
            shown = self.visible_count(),
            "Applied tag filter"
        );
    }

    /// Show projects whose title contains the trimmed, lowercased query.
    /// An empty query shows everything. The active chip is left as-is.
    pub fn apply_search(&mut self, raw: &str, projects: &[Project]) {
        self.query = raw.to_string();
        let needle = raw.trim().to_lowercase();
        self.visible = projects
            .iter()
            .map(|p| p.title.to_lowercase().contains(&needle))
            .collect();
        debug!(
            query = %needle,
            shown = self.visible_count(),
            "Applied title search"
        );
    }

    pub fn is_visible(&self, idx: usize) -> bool {
        self.visible.get(idx).copied().unwrap_or(false)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }

    /// Indices of the currently visible projects, in document order.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.visible
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.then_some(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(title: &str, tech: &str) -> Project {
        Project {
            title: title.to_string(),
            tech: tech.to_string(),
            blurb: String::new(),
            link: None,
        }
    }

    fn sample_projects() -> Vec<Project> {
        vec![
            project("Flux Reader", "rust, tokio"),
            project("Quartz Notes", "typescript, react"),
            project("Beacon CLI", "rust, clap"),
        ]
    }

    fn tokens() -> Vec<String> {
        vec!["all".into(), "rust".into(), "react".into()]
    }

    #[test]
    fn starts_with_first_chip_active_and_all_visible() {
        let filter = ProjectFilter::new(&tokens(), 3);
        assert_eq!(filter.active_chip(), Some(0));
        assert_eq!(filter.visible_count(), 3);
    }

    #[test]
    fn chip_selection_is_exclusive() {
        let projects = sample_projects();
        let mut filter = ProjectFilter::new(&tokens(), projects.len());

        filter.select_chip(1, &projects);
        assert_eq!(filter.active_chip(), Some(1));
        assert!(!filter.chips()[0].active);

        filter.select_chip(2, &projects);
        assert_eq!(filter.active_chip(), Some(2));
        assert!(!filter.chips()[1].active);
    }

    #[test]
    fn tag_filter_is_case_insensitive_substring() {
        let projects = sample_projects();
        let mut filter = ProjectFilter::new(&tokens(), projects.len());

        filter.apply_tag_filter("RUST", &projects);
        assert_eq!(filter.visible_indices(), vec![0, 2]);

        filter.apply_tag_filter("react", &projects);
        assert_eq!(filter.visible_indices(), vec![1]);

        filter.apply_tag_filter("all", &projects);
        assert_eq!(filter.visible_count(), 3);
    }

    #[test]
    fn search_overwrites_tag_filter() {
        let projects = sample_projects();
        let mut filter = ProjectFilter::new(&tokens(), projects.len());

        filter.select_chip(1, &projects);
        assert_eq!(filter.visible_indices(), vec![0, 2]);

        // The search pass rebuilds visibility from all projects, so a
        // title hidden by the chip can reappear.
        filter.apply_search("quartz", &projects);
        assert_eq!(filter.visible_indices(), vec![1]);

        // The chip itself stays marked active.
        assert_eq!(filter.active_chip(), Some(1));
    }

    #[test]
    fn tag_filter_overwrites_search() {
        let projects = sample_projects();
        let mut filter = ProjectFilter::new(&tokens(), projects.len());

        filter.apply_search("beacon", &projects);
        assert_eq!(filter.visible_indices(), vec![2]);

        filter.select_chip(2, &projects);
        assert_eq!(filter.visible_indices(), vec![1]);
    }

    #[test]
    fn search_trims_and_ignores_case() {
        let projects = sample_projects();
        let mut filter = ProjectFilter::new(&tokens(), projects.len());

        filter.apply_search("  FLUX  ", &projects);
        assert_eq!(filter.visible_indices(), vec![0]);

        // Whitespace-only trims to empty, which shows everything.
        filter.apply_search("   ", &projects);
        assert_eq!(filter.visible_count(), 3);
    }

    #[test]
    fn out_of_range_chip_is_ignored() {
        let projects = sample_projects();
        let mut filter = ProjectFilter::new(&tokens(), projects.len());
        filter.select_chip(1, &projects);

        filter.select_chip(99, &projects);
        assert_eq!(filter.active_chip(), Some(1));
        assert_eq!(filter.visible_indices(), vec![0, 2]);
    }
}

// View filtering for tasks

use crate::models::Task;

/// Which subset of the collection is exposed as the active view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum FilterCriterion {
    #[default]
    All,
    Completed,
    Pending,
}

impl FilterCriterion {
    pub const VARIANTS: [FilterCriterion; 3] = [FilterCriterion::All, FilterCriterion::Pending, FilterCriterion::Completed];

    pub fn matches(self, task: &Task) -> bool {
        match self {
            FilterCriterion::All => true,
            FilterCriterion::Completed => task.completed,
            FilterCriterion::Pending => !task.completed,
        }
    }
}

impl std::fmt::Display for FilterCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            FilterCriterion::All => "all",
            FilterCriterion::Completed => "completed",
            FilterCriterion::Pending => "pending",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(completed: bool) -> Task {
        let mut task = Task::new("sample".to_string());
        task.completed = completed;
        task
    }

    #[test]
    fn test_filter_matches() {
        let done = task(true);
        let open = task(false);

        assert!(FilterCriterion::All.matches(&done));
        assert!(FilterCriterion::All.matches(&open));
        assert!(FilterCriterion::Completed.matches(&done));
        assert!(!FilterCriterion::Completed.matches(&open));
        assert!(FilterCriterion::Pending.matches(&open));
        assert!(!FilterCriterion::Pending.matches(&done));
    }

    #[test]
    fn test_filter_default_is_all() {
        assert_eq!(FilterCriterion::default(), FilterCriterion::All);
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(FilterCriterion::All.to_string(), "all");
        assert_eq!(FilterCriterion::Completed.to_string(), "completed");
        assert_eq!(FilterCriterion::Pending.to_string(), "pending");
        assert_eq!(format!("{:<6}|", FilterCriterion::All), "all   |");
    }

    #[test]
    fn test_filter_variants_in_display_order() {
        let names: Vec<String> = FilterCriterion::VARIANTS.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["all", "pending", "completed"]);
    }
}

//! Tool catalog names and ordering.
//!
//! [`TOOL_ORDER`] is the order tools are advertised in `tools/list`; rmcp's
//! router does not preserve declaration order.

pub const SHOW_MERGE_DIFF: &str = "show_merge_diff";
pub const QUICK_MERGE_SUMMARY: &str = "quick_merge_summary";
pub const SHOW_FILE_DIFF: &str = "show_file_diff";

/// All tools, in advertised order.
pub const TOOL_ORDER: &[&str] = &[SHOW_MERGE_DIFF, QUICK_MERGE_SUMMARY, SHOW_FILE_DIFF];

/// Position of `name` in the catalog; unknown names sort last.
pub fn tool_position(name: &str) -> usize {
    TOOL_ORDER
        .iter()
        .position(|n| *n == name)
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let unique: HashSet<_> = TOOL_ORDER.iter().collect();
        assert_eq!(unique.len(), TOOL_ORDER.len());
    }

    #[test]
    fn positions_follow_catalog() {
        assert_eq!(tool_position(SHOW_MERGE_DIFF), 0);
        assert_eq!(tool_position(QUICK_MERGE_SUMMARY), 1);
        assert_eq!(tool_position(SHOW_FILE_DIFF), 2);
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(tool_position("Show_Merge_Diff"), usize::MAX);
        assert_eq!(tool_position("does_not_exist"), usize::MAX);
    }
}

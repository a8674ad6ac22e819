//! Head branches that must exist in the candidate repository.

use super::ReplicateError;
use bstr::ByteSlice;
use std::collections::BTreeSet;

/// Distinct head branch names referenced by open pull requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchSet {
    branches: BTreeSet<String>,
}

impl BranchSet {
    /// Builds the set from head branch names, validating each one.
    ///
    /// # Errors
    ///
    /// Returns [`ReplicateError::InvalidBranch`] for names that are not valid
    /// git branch names. A leading `-` is rejected too, since the name ends up
    /// in a git refspec.
    pub fn from_heads<I>(heads: I) -> Result<Self, ReplicateError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut branches = BTreeSet::new();
        for branch in heads {
            validate_branch_name(&branch)?;
            branches.insert(branch);
        }
        Ok(Self { branches })
    }

    /// Iterates branch names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.branches.iter().map(String::as_str)
    }

    /// Returns true if `branch` is in the set.
    #[must_use]
    pub fn contains(&self, branch: &str) -> bool {
        self.branches.contains(branch)
    }

    /// Number of distinct branches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Returns true when no open pull request exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

/// Remote-tracking ref holding `branch` in a fresh clone.
#[must_use]
pub fn remote_tracking_ref(branch: &str) -> String {
    format!("refs/remotes/origin/{branch}")
}

fn validate_branch_name(branch: &str) -> Result<(), ReplicateError> {
    if branch.starts_with('-') {
        return Err(ReplicateError::InvalidBranch {
            branch: branch.to_string(),
            message: "branch names may not start with '-'".to_string(),
        });
    }

    let full_ref = format!("refs/heads/{branch}");
    gix_validate::reference::name(full_ref.as_bytes().as_bstr())
        .map(|_| ())
        .map_err(|e| ReplicateError::InvalidBranch {
            branch: branch.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduplicates_and_sorts_heads() {
        let set = BranchSet::from_heads(vec![
            "feature-x".to_string(),
            "bugfix/login".to_string(),
            "feature-x".to_string(),
        ])
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec!["bugfix/login", "feature-x"]
        );
    }

    #[test]
    fn rejects_option_like_branch() {
        let result = BranchSet::from_heads(vec!["--force".to_string()]);
        assert!(matches!(result, Err(ReplicateError::InvalidBranch { .. })));
    }

    #[test]
    fn rejects_invalid_ref_name() {
        let result = BranchSet::from_heads(vec!["bad..name".to_string()]);
        assert!(matches!(result, Err(ReplicateError::InvalidBranch { .. })));
    }

    #[test]
    fn empty_when_no_pull_requests() {
        assert!(BranchSet::from_heads(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn builds_remote_tracking_ref() {
        assert_eq!(
            remote_tracking_ref("feature-x"),
            "refs/remotes/origin/feature-x"
        );
    }
}

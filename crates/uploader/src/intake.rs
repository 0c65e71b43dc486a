//! Intake validation: file-count ceiling and single-file mode.

use serde::{Deserialize, Serialize};

use crate::error::IntakeError;

/// Maximum number of files the registry may hold outside unlimited mode.
pub const FILES_NUMBER_LIMIT: usize = 20;

/// Subscription plan of the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Sandbox,
    Professional,
    Team,
    Enterprise,
}

/// Rules applied to every intake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakePolicy {
    /// Skip the file-count ceiling (self-hosted deployments).
    pub unlimited: bool,
    /// Keep only the first file of any intake, and only one file overall.
    pub single_file_only: bool,
}

impl IntakePolicy {
    /// Derives the policy from the deployment and billing plan.
    ///
    /// Sandbox plans under billing may only upload one file; the community
    /// edition has no count ceiling.
    pub fn for_plan(billing_enabled: bool, plan: PlanKind, community_edition: bool) -> Self {
        Self {
            unlimited: community_edition,
            single_file_only: billing_enabled && plan == PlanKind::Sandbox,
        }
    }

    /// Drops everything after the first file in single-file mode.
    pub fn truncate<T>(&self, mut files: Vec<T>) -> Vec<T> {
        if self.single_file_only {
            files.truncate(1);
        }
        files
    }

    /// Checks whether `incoming` new files fit next to `existing` ones.
    pub fn check(&self, incoming: usize, existing: usize) -> Result<(), IntakeError> {
        if self.single_file_only && existing > 0 {
            return Err(IntakeError::SingleFileOccupied);
        }

        let attempted = incoming + existing;
        if !self.unlimited && attempted > FILES_NUMBER_LIMIT {
            return Err(IntakeError::TooManyFiles {
                limit: FILES_NUMBER_LIMIT,
                attempted,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_ceiling_is_accepted() {
        let policy = IntakePolicy::default();
        assert!(policy.check(20, 0).is_ok());
        assert!(policy.check(5, 15).is_ok());
    }

    #[test]
    fn over_ceiling_is_rejected() {
        let policy = IntakePolicy::default();
        assert_eq!(
            policy.check(6, 15),
            Err(IntakeError::TooManyFiles {
                limit: 20,
                attempted: 21
            })
        );
    }

    #[test]
    fn unlimited_skips_ceiling() {
        let policy = IntakePolicy {
            unlimited: true,
            single_file_only: false,
        };
        assert!(policy.check(500, 20).is_ok());
    }

    #[test]
    fn single_file_truncates_to_first() {
        let policy = IntakePolicy {
            unlimited: false,
            single_file_only: true,
        };
        assert_eq!(policy.truncate(vec!["a", "b", "c"]), vec!["a"]);
        assert!(policy.truncate(Vec::<&str>::new()).is_empty());

        let batch = IntakePolicy::default();
        assert_eq!(batch.truncate(vec!["a", "b"]), vec!["a", "b"]);
    }

    #[test]
    fn single_file_rejects_second_intake() {
        let policy = IntakePolicy {
            unlimited: false,
            single_file_only: true,
        };
        assert!(policy.check(1, 0).is_ok());
        assert_eq!(policy.check(1, 1), Err(IntakeError::SingleFileOccupied));
    }

    #[test]
    fn policy_from_plan() {
        let sandbox = IntakePolicy::for_plan(true, PlanKind::Sandbox, false);
        assert!(sandbox.single_file_only);
        assert!(!sandbox.unlimited);

        let no_billing = IntakePolicy::for_plan(false, PlanKind::Sandbox, false);
        assert!(!no_billing.single_file_only);

        let team = IntakePolicy::for_plan(true, PlanKind::Team, false);
        assert!(!team.single_file_only);

        let community = IntakePolicy::for_plan(false, PlanKind::Sandbox, true);
        assert!(community.unlimited);
    }
}

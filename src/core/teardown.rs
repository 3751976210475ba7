use crate::domain::model::EntityKind;
use crate::domain::ports::Repository;
use crate::utils::error::Result;
use serde::Serialize;

/// Removal order: every kind comes after the kinds that reference it.
pub const TEARDOWN_ORDER: [EntityKind; 3] = [EntityKind::Visit, EntityKind::Pet, EntityKind::Owner];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeardownSummary {
    pub visits: usize,
    pub pets: usize,
    pub owners: usize,
}

impl TeardownSummary {
    pub fn total(&self) -> usize {
        self.visits + self.pets + self.owners
    }
}

/// Deletes all clinic records, dependents first. Meant for resetting demo and
/// test data.
pub async fn delete_all_owners_and_pets<R: Repository + ?Sized>(
    repository: &R,
) -> Result<TeardownSummary> {
    tracing::warn!("🧹 Deleting all visits, pets and owners");

    let mut summary = TeardownSummary::default();
    for kind in TEARDOWN_ORDER {
        let removed = repository.delete_all(kind).await?;
        tracing::info!("🧹 Deleted {} {} record(s)", removed, kind);
        match kind {
            EntityKind::Visit => summary.visits = removed,
            EntityKind::Pet => summary.pets = removed,
            EntityKind::Owner => summary.owners = removed,
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependents_are_removed_first() {
        let position = |kind: EntityKind| TEARDOWN_ORDER.iter().position(|k| *k == kind).unwrap();
        assert!(position(EntityKind::Visit) < position(EntityKind::Pet));
        assert!(position(EntityKind::Pet) < position(EntityKind::Owner));
    }

    #[test]
    fn test_summary_total() {
        let summary = TeardownSummary {
            visits: 3,
            pets: 2,
            owners: 1,
        };
        assert_eq!(summary.total(), 6);
    }
}

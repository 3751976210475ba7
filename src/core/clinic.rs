use crate::core::booking::BookingRules;
use crate::core::teardown::{delete_all_owners_and_pets, TeardownSummary};
use crate::domain::model::{
    EntityKind, NewOwner, NewPet, NewVisit, Owner, OwnerId, Pet, PetChanges, PetId, PetSpecies,
    Visit,
};
use crate::domain::ports::{Clock, Repository};
use crate::utils::error::{ClinicError, Result};
use crate::utils::validation::Validate;
use chrono::NaiveDateTime;

/// Clinic operations over a repository and a clock.
pub struct ClinicService<R: Repository, C: Clock> {
    repository: R,
    clock: C,
    rules: BookingRules,
}

impl<R: Repository, C: Clock> ClinicService<R, C> {
    pub fn new(repository: R, clock: C) -> Self {
        Self {
            repository,
            clock,
            rules: BookingRules::default(),
        }
    }

    pub fn with_rules(mut self, rules: BookingRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn rules(&self) -> &BookingRules {
        &self.rules
    }

    pub async fn register_owner(&self, name: impl Into<String>) -> Result<Owner> {
        let owner = NewOwner { name: name.into() };
        owner.validate()?;

        let owner = self.repository.persist_owner(owner).await?;
        tracing::info!("👤 Registered owner #{} {}", owner.id, owner.name);
        Ok(owner)
    }

    pub async fn register_pet(
        &self,
        owner_id: OwnerId,
        name: impl Into<String>,
        species: PetSpecies,
        notes: Option<String>,
    ) -> Result<Pet> {
        let owner = self.owner(owner_id).await?;
        let pet = NewPet {
            owner,
            name: name.into(),
            species,
            notes,
        };
        pet.validate()?;

        // (owner, name) uniqueness is left to the repository
        let pet = self.repository.persist_pet(pet).await?;
        tracing::info!("🐾 Registered pet #{} {}", pet.id(), pet.title());
        Ok(pet)
    }

    pub async fn update_pet(&self, pet_id: PetId, changes: PetChanges) -> Result<Pet> {
        let mut pet = self.pet(pet_id).await?;
        if changes.is_empty() {
            tracing::debug!("No changes requested for pet #{}", pet_id);
            return Ok(pet);
        }

        pet.apply(changes)?;
        let pet = self.repository.update_pet(&pet).await?;
        tracing::info!("✏️ Updated pet #{} {}", pet.id(), pet.title());
        Ok(pet)
    }

    pub async fn owner(&self, id: OwnerId) -> Result<Owner> {
        self.repository
            .find_owner(id)
            .await?
            .ok_or_else(|| ClinicError::not_found(EntityKind::Owner, id.0))
    }

    pub async fn pet(&self, id: PetId) -> Result<Pet> {
        self.repository
            .find_pet(id)
            .await?
            .ok_or_else(|| ClinicError::not_found(EntityKind::Pet, id.0))
    }

    pub async fn owners(&self) -> Result<Vec<Owner>> {
        let mut owners = self.repository.list_owners().await?;
        owners.sort();
        Ok(owners)
    }

    /// All pets in natural order: by owner, then by name.
    pub async fn pets(&self) -> Result<Vec<Pet>> {
        let mut pets = self.repository.list_pets().await?;
        pets.sort();
        Ok(pets)
    }

    pub async fn visits(&self, pet: Option<PetId>) -> Result<Vec<Visit>> {
        if let Some(id) = pet {
            self.pet(id).await?;
        }
        self.repository.list_visits(pet).await
    }

    /// The time proposed for a new visit when the caller does not pick one.
    pub fn default_visit_time(&self) -> NaiveDateTime {
        self.rules.default_visit_time(self.clock.now())
    }

    /// Returns the reason a visit at `proposed` would be refused, if any.
    pub fn validate_visit_time(&self, proposed: NaiveDateTime) -> Option<String> {
        self.rules
            .check_visit_time(proposed, self.clock.now())
            .map(str::to_string)
    }

    /// Books a visit for `pet`. Rejected with a validation error, and nothing
    /// persisted, when `at` is before the current time.
    pub async fn book_visit(
        &self,
        pet: &Pet,
        at: NaiveDateTime,
        reason: Option<String>,
    ) -> Result<Visit> {
        if let Some(message) = self.validate_visit_time(at) {
            tracing::warn!("⛔ Refused visit for {} at {}: {}", pet.title(), at, message);
            return Err(ClinicError::validation("at", message));
        }

        let visit = NewVisit {
            pet: pet.clone(),
            at,
            reason,
        };
        visit.validate()?;

        let visit = self.repository.persist_visit(visit).await?;
        tracing::info!(
            "📅 Booked visit #{} for {} at {}",
            visit.id(),
            visit.pet().title(),
            visit.at()
        );
        Ok(visit)
    }

    /// Looks up the pet, fills in the default time when `at` is `None`, then
    /// books as [`Self::book_visit`].
    pub async fn book_visit_for(
        &self,
        pet_id: PetId,
        at: Option<NaiveDateTime>,
        reason: Option<String>,
    ) -> Result<Visit> {
        let pet = self.pet(pet_id).await?;
        let at = at.unwrap_or_else(|| self.default_visit_time());
        self.book_visit(&pet, at, reason).await
    }

    pub async fn teardown(&self) -> Result<TeardownSummary> {
        delete_all_owners_and_pets(&self.repository).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FixedClock, InMemoryRepository};
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn service() -> ClinicService<InMemoryRepository, FixedClock> {
        ClinicService::new(InMemoryRepository::new(), FixedClock::new(at(1, 15, 30)))
    }

    #[tokio::test]
    async fn test_register_pet_for_unknown_owner() {
        let clinic = service();
        let err = clinic
            .register_pet(OwnerId(42), "Rex", PetSpecies::Dog, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClinicError::NotFound {
                entity: EntityKind::Owner,
                id: 42
            }
        ));
    }

    #[tokio::test]
    async fn test_register_owner_rejects_blank_name() {
        let clinic = service();
        assert!(clinic.register_owner("   ").await.unwrap_err().is_validation());
        assert!(clinic.owners().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_pet_with_no_changes_is_a_noop() {
        let clinic = service();
        let maria = clinic.register_owner("Maria").await.unwrap();
        let rex = clinic
            .register_pet(maria.id, "Rex", PetSpecies::Dog, None)
            .await
            .unwrap();

        let same = clinic.update_pet(rex.id(), PetChanges::default()).await.unwrap();
        assert_eq!(same.name(), "Rex");
    }

    #[tokio::test]
    async fn test_default_visit_time_follows_clock() {
        let clinic = service();
        assert_eq!(clinic.default_visit_time(), at(2, 9, 0));

        clinic.clock().set(at(2, 8, 0));
        assert_eq!(clinic.default_visit_time(), at(3, 9, 0));
    }

    #[tokio::test]
    async fn test_custom_message_is_reported() {
        let clinic = service().with_rules(BookingRules {
            past_date_message: "Esa fecha ya pasó".into(),
            default_visit_hour: 9,
        });
        assert_eq!(
            clinic.validate_visit_time(at(1, 8, 0)).as_deref(),
            Some("Esa fecha ya pasó")
        );
        assert_eq!(clinic.validate_visit_time(at(1, 16, 0)), None);
    }

    #[tokio::test]
    async fn test_visits_for_unknown_pet() {
        let clinic = service();
        assert!(matches!(
            clinic.visits(Some(PetId(3))).await,
            Err(ClinicError::NotFound { .. })
        ));
    }
}

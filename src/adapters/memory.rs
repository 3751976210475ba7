use crate::adapters::store::ClinicStore;
use crate::domain::model::{
    EntityKind, NewOwner, NewPet, NewVisit, Owner, OwnerId, Pet, PetId, Visit,
};
use crate::domain::ports::Repository;
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Repository that keeps all records in process memory.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    store: Mutex<ClinicStore>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self, kind: EntityKind) -> usize {
        self.store.lock().await.count(kind)
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn persist_owner(&self, owner: NewOwner) -> Result<Owner> {
        let owner = self.store.lock().await.insert_owner(owner)?;
        tracing::debug!("Persisted owner #{}", owner.id);
        Ok(owner)
    }

    async fn persist_pet(&self, pet: NewPet) -> Result<Pet> {
        let pet = self.store.lock().await.insert_pet(pet)?;
        tracing::debug!("Persisted pet #{}", pet.id());
        Ok(pet)
    }

    async fn persist_visit(&self, visit: NewVisit) -> Result<Visit> {
        let visit = self.store.lock().await.insert_visit(visit)?;
        tracing::debug!("Persisted visit #{}", visit.id());
        Ok(visit)
    }

    async fn update_pet(&self, pet: &Pet) -> Result<Pet> {
        self.store.lock().await.update_pet(pet)
    }

    async fn find_owner(&self, id: OwnerId) -> Result<Option<Owner>> {
        Ok(self.store.lock().await.owner(id))
    }

    async fn find_pet(&self, id: PetId) -> Result<Option<Pet>> {
        self.store.lock().await.pet(id)
    }

    async fn list_owners(&self) -> Result<Vec<Owner>> {
        Ok(self.store.lock().await.owners())
    }

    async fn list_pets(&self) -> Result<Vec<Pet>> {
        self.store.lock().await.pets()
    }

    async fn list_visits(&self, pet: Option<PetId>) -> Result<Vec<Visit>> {
        self.store.lock().await.visits(pet)
    }

    async fn delete_all(&self, kind: EntityKind) -> Result<usize> {
        self.store.lock().await.delete_all(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PetSpecies;

    #[test]
    fn test_persist_assigns_identities() {
        let repo = InMemoryRepository::new();

        tokio_test::block_on(async {
            let maria = repo
                .persist_owner(NewOwner {
                    name: "Maria".into(),
                })
                .await
                .unwrap();
            let rex = repo
                .persist_pet(NewPet {
                    owner: maria.clone(),
                    name: "Rex".into(),
                    species: PetSpecies::Dog,
                    notes: None,
                })
                .await
                .unwrap();

            assert_eq!(maria.id.0, 1);
            assert_eq!(rex.id().0, 1);
            assert_eq!(repo.find_pet(rex.id()).await.unwrap(), Some(rex));
            assert_eq!(repo.find_owner(maria.id).await.unwrap(), Some(maria));
            assert_eq!(repo.count(EntityKind::Pet).await, 1);
        });
    }

    #[test]
    fn test_missing_records_are_none() {
        let repo = InMemoryRepository::new();

        tokio_test::block_on(async {
            assert!(repo.find_owner(OwnerId(1)).await.unwrap().is_none());
            assert!(repo.find_pet(PetId(1)).await.unwrap().is_none());
            assert!(repo.list_visits(None).await.unwrap().is_empty());
        });
    }
}

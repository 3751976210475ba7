use crate::domain::model::{
    EntityKind, NewOwner, NewPet, NewVisit, Owner, OwnerId, Pet, PetId, Visit,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;

/// Byte-level file access used by persistent repositories.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// Record persistence. Implementations assign identities, enforce the
/// declared unique keys and foreign keys, and make each call atomic.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn persist_owner(&self, owner: NewOwner) -> Result<Owner>;
    async fn persist_pet(&self, pet: NewPet) -> Result<Pet>;
    async fn persist_visit(&self, visit: NewVisit) -> Result<Visit>;

    /// Writes back the editable fields of an existing pet.
    async fn update_pet(&self, pet: &Pet) -> Result<Pet>;

    async fn find_owner(&self, id: OwnerId) -> Result<Option<Owner>>;
    async fn find_pet(&self, id: PetId) -> Result<Option<Pet>>;

    async fn list_owners(&self) -> Result<Vec<Owner>>;
    async fn list_pets(&self) -> Result<Vec<Pet>>;
    async fn list_visits(&self, pet: Option<PetId>) -> Result<Vec<Visit>>;

    /// Removes every record of `kind`, returning how many were removed.
    async fn delete_all(&self, kind: EntityKind) -> Result<usize>;
}

#[async_trait]
impl<R: Repository + ?Sized> Repository for Arc<R> {
    async fn persist_owner(&self, owner: NewOwner) -> Result<Owner> {
        (**self).persist_owner(owner).await
    }

    async fn persist_pet(&self, pet: NewPet) -> Result<Pet> {
        (**self).persist_pet(pet).await
    }

    async fn persist_visit(&self, visit: NewVisit) -> Result<Visit> {
        (**self).persist_visit(visit).await
    }

    async fn update_pet(&self, pet: &Pet) -> Result<Pet> {
        (**self).update_pet(pet).await
    }

    async fn find_owner(&self, id: OwnerId) -> Result<Option<Owner>> {
        (**self).find_owner(id).await
    }

    async fn find_pet(&self, id: PetId) -> Result<Option<Pet>> {
        (**self).find_pet(id).await
    }

    async fn list_owners(&self) -> Result<Vec<Owner>> {
        (**self).list_owners().await
    }

    async fn list_pets(&self) -> Result<Vec<Pet>> {
        (**self).list_pets().await
    }

    async fn list_visits(&self, pet: Option<PetId>) -> Result<Vec<Visit>> {
        (**self).list_visits(pet).await
    }

    async fn delete_all(&self, kind: EntityKind) -> Result<usize> {
        (**self).delete_all(kind).await
    }
}

use crate::adapters::store::ClinicStore;
use crate::domain::model::{
    EntityKind, NewOwner, NewPet, NewVisit, Owner, OwnerId, Pet, PetId, Visit,
};
use crate::domain::ports::{Repository, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

pub const DEFAULT_DATA_FILE: &str = "clinic.json";

/// Repository persisted as a single JSON snapshot through a [`Storage`].
///
/// Writes operate on a copy of the tables; the copy replaces the live state
/// only once the snapshot has been written, so a failed write changes nothing.
pub struct FileRepository<S: Storage> {
    storage: S,
    file_name: String,
    store: Mutex<ClinicStore>,
}

impl<S: Storage> FileRepository<S> {
    /// Loads the snapshot if it exists, otherwise starts empty.
    pub async fn open(storage: S, file_name: impl Into<String>) -> Result<Self> {
        let file_name = file_name.into();
        let store = if storage.exists(&file_name).await? {
            let data = storage.read_file(&file_name).await?;
            let store: ClinicStore = serde_json::from_slice(&data)?;
            tracing::info!(
                "📂 Loaded {} owners, {} pets, {} visits from {}",
                store.count(EntityKind::Owner),
                store.count(EntityKind::Pet),
                store.count(EntityKind::Visit),
                file_name
            );
            store
        } else {
            tracing::info!("📂 No data file at {}, starting empty", file_name);
            ClinicStore::new()
        };

        Ok(Self {
            storage,
            file_name,
            store: Mutex::new(store),
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    async fn write_snapshot(&self, store: &ClinicStore) -> Result<()> {
        let data = serde_json::to_vec_pretty(store)?;
        self.storage.write_file(&self.file_name, &data).await?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), self.file_name);
        Ok(())
    }

    async fn mutate<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut ClinicStore) -> Result<T> + Send,
        T: Send,
    {
        let mut live = self.store.lock().await;
        let mut next = live.clone();
        let out = op(&mut next)?;
        self.write_snapshot(&next).await?;
        *live = next;
        Ok(out)
    }
}

#[async_trait]
impl<S: Storage> Repository for FileRepository<S> {
    async fn persist_owner(&self, owner: NewOwner) -> Result<Owner> {
        self.mutate(|store| store.insert_owner(owner)).await
    }

    async fn persist_pet(&self, pet: NewPet) -> Result<Pet> {
        self.mutate(|store| store.insert_pet(pet)).await
    }

    async fn persist_visit(&self, visit: NewVisit) -> Result<Visit> {
        self.mutate(|store| store.insert_visit(visit)).await
    }

    async fn update_pet(&self, pet: &Pet) -> Result<Pet> {
        self.mutate(|store| store.update_pet(pet)).await
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
        self.mutate(|store| store.delete_all(kind)).await
    }
}

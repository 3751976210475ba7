use crate::domain::model::{
    EntityKind, NewOwner, NewPet, NewVisit, Owner, OwnerId, Pet, PetId, PetSpecies, Visit,
    VisitId,
};
use crate::domain::schema::{EntitySchema, PET_SCHEMA};
use crate::utils::error::{ClinicError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct OwnerRow {
    id: u64,
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PetRow {
    id: u64,
    owner_id: u64,
    name: String,
    species: PetSpecies,
    notes: Option<String>,
}

impl PetRow {
    fn column(&self, name: &str) -> Option<String> {
        match name {
            "owner" => Some(self.owner_id.to_string()),
            "name" => Some(self.name.clone()),
            "species" => Some(self.species.as_str().to_string()),
            "notes" => self.notes.clone(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct VisitRow {
    id: u64,
    pet_id: u64,
    at: NaiveDateTime,
    reason: Option<String>,
}

/// Last id handed out per table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Sequences {
    owner: u64,
    pet: u64,
    visit: u64,
}

/// Normalized clinic tables. Pets reference owners and visits reference
/// pets by id; every write enforces the unique and foreign keys declared in
/// the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicStore {
    #[serde(default)]
    sequences: Sequences,
    owners: BTreeMap<u64, OwnerRow>,
    pets: BTreeMap<u64, PetRow>,
    visits: BTreeMap<u64, VisitRow>,
}

impl ClinicStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids are never reused, even after a teardown empties the table.
    fn allocate_id(&mut self, kind: EntityKind) -> u64 {
        let highest = match kind {
            EntityKind::Owner => self.owners.keys().next_back(),
            EntityKind::Pet => self.pets.keys().next_back(),
            EntityKind::Visit => self.visits.keys().next_back(),
        }
        .copied()
        .unwrap_or(0);
        let sequence = match kind {
            EntityKind::Owner => &mut self.sequences.owner,
            EntityKind::Pet => &mut self.sequences.pet,
            EntityKind::Visit => &mut self.sequences.visit,
        };
        *sequence = (*sequence).max(highest) + 1;
        *sequence
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Owner => self.owners.len(),
            EntityKind::Pet => self.pets.len(),
            EntityKind::Visit => self.visits.len(),
        }
    }

    fn contains(&self, kind: EntityKind, id: u64) -> bool {
        match kind {
            EntityKind::Owner => self.owners.contains_key(&id),
            EntityKind::Pet => self.pets.contains_key(&id),
            EntityKind::Visit => self.visits.contains_key(&id),
        }
    }

    pub fn insert_owner(&mut self, owner: NewOwner) -> Result<Owner> {
        let id = self.allocate_id(EntityKind::Owner);
        let row = OwnerRow {
            id,
            name: owner.name,
        };
        let owner = Self::owner_from_row(&row);
        self.owners.insert(id, row);
        Ok(owner)
    }

    pub fn insert_pet(&mut self, pet: NewPet) -> Result<Pet> {
        let owner_id = pet.owner.id.0;
        self.ensure_referenced(EntityKind::Pet, EntityKind::Owner, owner_id)?;

        let mut row = PetRow {
            id: 0,
            owner_id,
            name: pet.name,
            species: pet.species,
            notes: pet.notes,
        };
        self.ensure_unique_pet(&row)?;

        let id = self.allocate_id(EntityKind::Pet);
        row.id = id;
        self.pets.insert(id, row);
        self.pet(PetId(id))?
            .ok_or_else(|| ClinicError::not_found(EntityKind::Pet, id))
    }

    /// Only the editable columns (name, notes) are written.
    pub fn update_pet(&mut self, pet: &Pet) -> Result<Pet> {
        let id = pet.id().0;
        let mut row = self
            .pets
            .get(&id)
            .cloned()
            .ok_or_else(|| ClinicError::not_found(EntityKind::Pet, id))?;
        row.name = pet.name().to_string();
        row.notes = pet.notes().map(str::to_string);
        self.ensure_unique_pet(&row)?;

        self.pets.insert(id, row);
        self.pet(pet.id())?
            .ok_or_else(|| ClinicError::not_found(EntityKind::Pet, id))
    }

    pub fn insert_visit(&mut self, visit: NewVisit) -> Result<Visit> {
        let pet_id = visit.pet.id().0;
        self.ensure_referenced(EntityKind::Visit, EntityKind::Pet, pet_id)?;

        let id = self.allocate_id(EntityKind::Visit);
        let row = VisitRow {
            id,
            pet_id,
            at: visit.at,
            reason: visit.reason,
        };
        let visit = self.visit_from_row(&row)?;
        self.visits.insert(id, row);
        Ok(visit)
    }

    pub fn owner(&self, id: OwnerId) -> Option<Owner> {
        self.owners.get(&id.0).map(Self::owner_from_row)
    }

    pub fn pet(&self, id: PetId) -> Result<Option<Pet>> {
        self.pets
            .get(&id.0)
            .map(|row| self.pet_from_row(row))
            .transpose()
    }

    pub fn owners(&self) -> Vec<Owner> {
        let mut owners: Vec<Owner> = self.owners.values().map(Self::owner_from_row).collect();
        owners.sort();
        owners
    }

    pub fn pets(&self) -> Result<Vec<Pet>> {
        let mut pets = self
            .pets
            .values()
            .map(|row| self.pet_from_row(row))
            .collect::<Result<Vec<_>>>()?;
        pets.sort();
        Ok(pets)
    }

    pub fn visits(&self, pet: Option<PetId>) -> Result<Vec<Visit>> {
        let mut visits = self
            .visits
            .values()
            .filter(|row| pet.map_or(true, |p| row.pet_id == p.0))
            .map(|row| self.visit_from_row(row))
            .collect::<Result<Vec<_>>>()?;
        visits.sort_by(|a, b| a.at().cmp(&b.at()).then_with(|| a.id().cmp(&b.id())));
        Ok(visits)
    }

    /// Bulk delete. Fails without removing anything if records of another
    /// kind still reference the ones being deleted.
    pub fn delete_all(&mut self, kind: EntityKind) -> Result<usize> {
        for (dependent, fk) in EntitySchema::referencing(kind) {
            let remaining = self.count(dependent.entity);
            if remaining > 0 {
                return Err(ClinicError::ForeignKeyViolation {
                    constraint: fk.name.to_string(),
                    message: format!(
                        "{} {} record(s) still reference {}; delete them first",
                        remaining, dependent.entity, kind
                    ),
                });
            }
        }

        let removed = self.count(kind);
        match kind {
            EntityKind::Owner => self.owners.clear(),
            EntityKind::Pet => self.pets.clear(),
            EntityKind::Visit => self.visits.clear(),
        }
        Ok(removed)
    }

    fn ensure_referenced(&self, table: EntityKind, target: EntityKind, id: u64) -> Result<()> {
        match EntitySchema::for_kind(table).foreign_key_to(target) {
            Some(fk) if !self.contains(target, id) => Err(ClinicError::ForeignKeyViolation {
                constraint: fk.name.to_string(),
                message: format!("{} {} does not exist", target, id),
            }),
            _ => Ok(()),
        }
    }

    /// Checks `candidate` against every unique key declared for pets,
    /// ignoring the stored row with the same id.
    fn ensure_unique_pet(&self, candidate: &PetRow) -> Result<()> {
        for constraint in PET_SCHEMA.unique {
            let clash = self.pets.values().any(|row| {
                row.id != candidate.id
                    && constraint
                        .columns
                        .iter()
                        .all(|column| row.column(column) == candidate.column(column))
            });
            if clash {
                let owner_name = self
                    .owners
                    .get(&candidate.owner_id)
                    .map(|o| o.name.as_str())
                    .unwrap_or("this owner");
                return Err(ClinicError::UniqueViolation {
                    constraint: constraint.name.to_string(),
                    message: format!("{} already has a pet named '{}'", owner_name, candidate.name),
                });
            }
        }
        Ok(())
    }

    fn foreign_key_name(table: EntityKind, target: EntityKind) -> String {
        EntitySchema::for_kind(table)
            .foreign_key_to(target)
            .map_or_else(|| format!("{}_{}_FK", table, target), |fk| fk.name.to_string())
    }

    fn owner_from_row(row: &OwnerRow) -> Owner {
        Owner {
            id: OwnerId(row.id),
            name: row.name.clone(),
        }
    }

    fn pet_from_row(&self, row: &PetRow) -> Result<Pet> {
        let owner = self
            .owner(OwnerId(row.owner_id))
            .ok_or_else(|| ClinicError::ForeignKeyViolation {
                constraint: Self::foreign_key_name(EntityKind::Pet, EntityKind::Owner),
                message: format!("Pet {} references missing owner {}", row.id, row.owner_id),
            })?;
        Ok(Pet::from_parts(
            PetId(row.id),
            owner,
            row.name.clone(),
            row.species,
            row.notes.clone(),
        ))
    }

    fn visit_from_row(&self, row: &VisitRow) -> Result<Visit> {
        let pet = self
            .pets
            .get(&row.pet_id)
            .map(|p| self.pet_from_row(p))
            .transpose()?
            .ok_or_else(|| ClinicError::ForeignKeyViolation {
                constraint: Self::foreign_key_name(EntityKind::Visit, EntityKind::Pet),
                message: format!("Visit {} references missing pet {}", row.id, row.pet_id),
            })?;
        Ok(Visit::from_parts(
            VisitId(row.id),
            pet,
            row.at,
            row.reason.clone(),
        ))
    }
}

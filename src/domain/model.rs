use crate::domain::schema::PET_SCHEMA;
use crate::utils::error::{ClinicError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(OwnerId);
entity_id!(PetId);
entity_id!(VisitId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Owner,
    Pet,
    Visit,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Owner => "Owner",
            EntityKind::Pet => "Pet",
            EntityKind::Visit => "Visit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PetSpecies {
    Dog,
    Cat,
    Hamster,
    Budgerigar,
}

impl PetSpecies {
    pub const ALL: [PetSpecies; 4] = [
        PetSpecies::Dog,
        PetSpecies::Cat,
        PetSpecies::Hamster,
        PetSpecies::Budgerigar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PetSpecies::Dog => "DOG",
            PetSpecies::Cat => "CAT",
            PetSpecies::Hamster => "HAMSTER",
            PetSpecies::Budgerigar => "BUDGERIGAR",
        }
    }
}

impl fmt::Display for PetSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PetSpecies {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self> {
        PetSpecies::ALL
            .into_iter()
            .find(|species| species.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ClinicError::validation(
                    "species",
                    format!(
                        "Unknown species '{}'. Expected one of: {}",
                        s,
                        PetSpecies::ALL.map(|sp| sp.as_str()).join(", ")
                    ),
                )
            })
    }
}

/// Input for registering an owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOwner {
    pub name: String,
}

/// Natural ordering is by name, with the id as tie-breaker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    pub name: String,
}

impl PartialEq for Owner {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Owner {}

impl PartialOrd for Owner {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Owner {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Input for registering a pet.
#[derive(Debug, Clone)]
pub struct NewPet {
    pub owner: Owner,
    pub name: String,
    pub species: PetSpecies,
    pub notes: Option<String>,
}

/// Changes to the editable fields of a pet. Owner and species are fixed at
/// registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetChanges {
    pub name: Option<String>,
    /// `Some(None)` clears the notes.
    pub notes: Option<Option<String>>,
}

impl PetChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.notes.is_none()
    }
}

/// A pet belongs to exactly one owner. Pets are equal and ordered by their
/// natural key `(owner, name)`, which storage keeps unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    id: PetId,
    owner: Owner,
    name: String,
    species: PetSpecies,
    notes: Option<String>,
}

impl Pet {
    pub(crate) fn from_parts(
        id: PetId,
        owner: Owner,
        name: String,
        species: PetSpecies,
        notes: Option<String>,
    ) -> Self {
        Self {
            id,
            owner,
            name,
            species,
            notes,
        }
    }

    pub fn id(&self) -> PetId {
        self.id
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn species(&self) -> PetSpecies {
        self.species
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn title(&self) -> String {
        format!(
            "{} ({} owned by {})",
            self.name,
            self.species.as_str().to_lowercase(),
            self.owner.name
        )
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        PET_SCHEMA.check_edit("name", Some(&name))?;
        self.name = name;
        Ok(())
    }

    pub fn set_notes(&mut self, notes: Option<String>) -> Result<()> {
        PET_SCHEMA.check_edit("notes", notes.as_deref())?;
        self.notes = notes;
        Ok(())
    }

    /// Applies the editable fields of `changes`. Nothing is changed unless
    /// every field passes validation.
    pub fn apply(&mut self, changes: PetChanges) -> Result<()> {
        if let Some(name) = &changes.name {
            PET_SCHEMA.check_edit("name", Some(name))?;
        }
        if let Some(notes) = &changes.notes {
            PET_SCHEMA.check_edit("notes", notes.as_deref())?;
        }

        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(notes) = changes.notes {
            self.notes = notes;
        }
        Ok(())
    }
}

impl PartialEq for Pet {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pet {}

impl PartialOrd for Pet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pet {
    fn cmp(&self, other: &Self) -> Ordering {
        self.owner
            .cmp(&other.owner)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl fmt::Display for Pet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A visit before the repository has assigned it an identity.
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub pet: Pet,
    pub at: NaiveDateTime,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    id: VisitId,
    pet: Pet,
    at: NaiveDateTime,
    reason: Option<String>,
}

impl Visit {
    pub(crate) fn from_parts(
        id: VisitId,
        pet: Pet,
        at: NaiveDateTime,
        reason: Option<String>,
    ) -> Self {
        Self { id, pet, at, reason }
    }

    pub fn id(&self) -> VisitId {
        self.id
    }

    pub fn pet(&self) -> &Pet {
        &self.pet
    }

    pub fn at(&self) -> NaiveDateTime {
        self.at
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(id: u64, name: &str) -> Owner {
        Owner {
            id: OwnerId(id),
            name: name.to_string(),
        }
    }

    fn pet(id: u64, owner: Owner, name: &str, species: PetSpecies) -> Pet {
        Pet::from_parts(PetId(id), owner, name.to_string(), species, None)
    }

    #[test]
    fn test_title_lowercases_species() {
        let rex = pet(1, owner(1, "Maria"), "Rex", PetSpecies::Dog);
        assert_eq!(rex.title(), "Rex (dog owned by Maria)");
    }

    #[test]
    fn test_owner_ordering_dominates_name() {
        let a = pet(1, owner(1, "Alice"), "Zoe", PetSpecies::Cat);
        let b = pet(2, owner(2, "Bob"), "Amy", PetSpecies::Cat);
        assert_eq!(a.cmp(&b), Ordering::Less);
        assert!(a < b);
    }

    #[test]
    fn test_same_owner_orders_by_name() {
        let alice = owner(1, "Alice");
        let max = pet(1, alice.clone(), "Max", PetSpecies::Dog);
        let bella = pet(2, alice, "Bella", PetSpecies::Hamster);

        let mut pets = vec![max, bella];
        pets.sort();
        let names: Vec<&str> = pets.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Bella", "Max"]);
    }

    #[test]
    fn test_owners_with_same_name_tie_break_on_id() {
        assert!(owner(1, "Sam") < owner(2, "Sam"));
        assert_ne!(owner(1, "Sam"), owner(2, "Sam"));
    }

    #[test]
    fn test_species_parse_is_case_insensitive() {
        assert_eq!("dog".parse::<PetSpecies>().unwrap(), PetSpecies::Dog);
        assert_eq!("Budgerigar".parse::<PetSpecies>().unwrap(), PetSpecies::Budgerigar);
        assert!("dragon".parse::<PetSpecies>().unwrap_err().is_validation());
    }

    #[test]
    fn test_apply_changes_validates_name_length() {
        let mut rex = pet(1, owner(1, "Maria"), "Rex", PetSpecies::Dog);
        let err = rex
            .apply(PetChanges {
                name: Some("x".repeat(41)),
                notes: None,
            })
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(rex.name(), "Rex");

        rex.apply(PetChanges {
            name: Some("Rexy".into()),
            notes: Some(Some("Allergic to penicillin".into())),
        })
        .unwrap();
        assert_eq!(rex.name(), "Rexy");
        assert_eq!(rex.notes(), Some("Allergic to penicillin"));

        rex.apply(PetChanges {
            name: None,
            notes: Some(None),
        })
        .unwrap();
        assert_eq!(rex.notes(), None);
    }
}

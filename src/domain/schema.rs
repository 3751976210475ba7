//! Declared table schemas for the clinic entities.
//!
//! Column constraints (nullability, maximum length, editability) and unique
//! keys live here as plain data. Inputs are checked against them at the
//! service boundary, and the store enforces the unique and foreign keys
//! declared here.

use crate::domain::model::{EntityKind, NewOwner, NewPet, NewVisit};
use crate::utils::error::{ClinicError, Result};
use crate::utils::validation::{validate_text_field, Validate};

pub const NAME_MAX_LENGTH: usize = 40;
pub const LONG_TEXT_MAX_LENGTH: usize = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub max_length: Option<usize>,
    pub editable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueConstraint {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub name: &'static str,
    pub column: &'static str,
    pub references: EntityKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    pub entity: EntityKind,
    pub table: &'static str,
    pub fields: &'static [FieldSpec],
    pub unique: &'static [UniqueConstraint],
    pub foreign_keys: &'static [ForeignKey],
}

pub const OWNER_SCHEMA: EntitySchema = EntitySchema {
    entity: EntityKind::Owner,
    table: "pets.Owner",
    fields: &[FieldSpec {
        name: "name",
        required: true,
        max_length: Some(NAME_MAX_LENGTH),
        editable: true,
    }],
    unique: &[],
    foreign_keys: &[],
};

pub const PET_OWNER_NAME_UNIQUE: UniqueConstraint = UniqueConstraint {
    name: "Pet_owner_name_UNQ",
    columns: &["owner", "name"],
};

pub const PET_OWNER_FK: ForeignKey = ForeignKey {
    name: "Pet_owner_FK",
    column: "ownerId",
    references: EntityKind::Owner,
};

pub const PET_SCHEMA: EntitySchema = EntitySchema {
    entity: EntityKind::Pet,
    table: "pets.Pet",
    fields: &[
        FieldSpec {
            name: "owner",
            required: true,
            max_length: None,
            editable: false,
        },
        FieldSpec {
            name: "name",
            required: true,
            max_length: Some(NAME_MAX_LENGTH),
            editable: true,
        },
        FieldSpec {
            name: "species",
            required: true,
            max_length: None,
            editable: false,
        },
        FieldSpec {
            name: "notes",
            required: false,
            max_length: Some(LONG_TEXT_MAX_LENGTH),
            editable: true,
        },
    ],
    unique: &[PET_OWNER_NAME_UNIQUE],
    foreign_keys: &[PET_OWNER_FK],
};

pub const VISIT_PET_FK: ForeignKey = ForeignKey {
    name: "Visit_pet_FK",
    column: "petId",
    references: EntityKind::Pet,
};

pub const VISIT_SCHEMA: EntitySchema = EntitySchema {
    entity: EntityKind::Visit,
    table: "visits.Visit",
    fields: &[
        FieldSpec {
            name: "pet",
            required: true,
            max_length: None,
            editable: false,
        },
        FieldSpec {
            name: "at",
            required: true,
            max_length: None,
            editable: false,
        },
        FieldSpec {
            name: "reason",
            required: false,
            max_length: Some(LONG_TEXT_MAX_LENGTH),
            editable: false,
        },
    ],
    unique: &[],
    foreign_keys: &[VISIT_PET_FK],
};

pub const SCHEMAS: [&EntitySchema; 3] = [&OWNER_SCHEMA, &PET_SCHEMA, &VISIT_SCHEMA];

impl EntitySchema {
    pub fn for_kind(kind: EntityKind) -> &'static EntitySchema {
        match kind {
            EntityKind::Owner => &OWNER_SCHEMA,
            EntityKind::Pet => &PET_SCHEMA,
            EntityKind::Visit => &VISIT_SCHEMA,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_editable(&self, name: &str) -> bool {
        self.field(name).map(|f| f.editable).unwrap_or(false)
    }

    pub fn foreign_key_to(&self, kind: EntityKind) -> Option<&'static ForeignKey> {
        let keys: &'static [ForeignKey] = self.foreign_keys;
        keys.iter().find(|fk| fk.references == kind)
    }

    /// Every table holding a foreign key to `kind`, with that key.
    pub fn referencing(
        kind: EntityKind,
    ) -> impl Iterator<Item = (&'static EntitySchema, &'static ForeignKey)> {
        SCHEMAS
            .into_iter()
            .filter_map(move |schema| schema.foreign_key_to(kind).map(|fk| (schema, fk)))
    }

    /// Checks a text column value against its declared constraints.
    pub fn check_text(&self, field: &str, value: Option<&str>) -> Result<()> {
        let spec = self.field(field).ok_or_else(|| {
            ClinicError::validation(
                field,
                format!("{} has no field named '{}'", self.entity, field),
            )
        })?;
        validate_text_field(spec.name, value, spec.required, spec.max_length)
    }

    /// Like [`check_text`](Self::check_text), but also refuses columns that
    /// are fixed once the record exists.
    pub fn check_edit(&self, field: &str, value: Option<&str>) -> Result<()> {
        if self.field(field).is_some() && !self.is_editable(field) {
            return Err(ClinicError::validation(
                field,
                format!("{} {} cannot be changed", self.entity, field),
            ));
        }
        self.check_text(field, value)
    }
}

impl Validate for NewOwner {
    fn validate(&self) -> Result<()> {
        OWNER_SCHEMA.check_text("name", Some(&self.name))
    }
}

impl Validate for NewPet {
    fn validate(&self) -> Result<()> {
        PET_SCHEMA.check_text("name", Some(&self.name))?;
        PET_SCHEMA.check_text("notes", self.notes.as_deref())
    }
}

impl Validate for NewVisit {
    fn validate(&self) -> Result<()> {
        VISIT_SCHEMA.check_text("reason", self.reason.as_deref())
    }
}

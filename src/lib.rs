pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{Cli, Command};
pub use config::ClinicConfig;

pub use adapters::{FileRepository, FixedClock, InMemoryRepository, LocalStorage, SystemClock};
pub use crate::core::{
    booking::BookingRules,
    clinic::ClinicService,
    teardown::{delete_all_owners_and_pets, TeardownSummary},
};
pub use domain::model::{
    EntityKind, Owner, OwnerId, Pet, PetChanges, PetId, PetSpecies, Visit, VisitId,
};
pub use domain::ports::{Clock, Repository, Storage};
pub use utils::error::{ClinicError, Result};

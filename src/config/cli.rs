use crate::domain::model::{OwnerId, PetId, PetSpecies};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub fn parse_datetime(value: &str) -> std::result::Result<NaiveDateTime, String> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value.trim(), fmt).ok())
        .ok_or_else(|| format!("'{}' is not a date-time like 2024-01-02T09:00", value))
}

fn parse_species(value: &str) -> std::result::Result<PetSpecies, String> {
    value.parse().map_err(|e: crate::utils::error::ClinicError| e.user_friendly_message())
}

fn parse_owner_id(value: &str) -> std::result::Result<OwnerId, String> {
    value
        .parse::<u64>()
        .map(OwnerId)
        .map_err(|e| format!("invalid owner id '{}': {}", value, e))
}

fn parse_pet_id(value: &str) -> std::result::Result<PetId, String> {
    value
        .parse::<u64>()
        .map(PetId)
        .map_err(|e| format!("invalid pet id '{}': {}", value, e))
}

#[derive(Debug, Parser)]
#[command(name = "pet-clinic")]
#[command(about = "Record keeping for a small veterinary clinic")]
pub struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "clinic.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a pet owner
    AddOwner {
        #[arg(long)]
        name: String,
    },

    /// Register a pet for an existing owner
    AddPet {
        #[arg(long, value_parser = parse_owner_id)]
        owner: OwnerId,
        #[arg(long)]
        name: String,
        /// dog, cat, hamster or budgerigar
        #[arg(long, value_parser = parse_species)]
        species: PetSpecies,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Change a pet's name or notes
    EditPet {
        #[arg(long, value_parser = parse_pet_id)]
        id: PetId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,
        #[arg(long)]
        clear_notes: bool,
    },

    ListOwners,

    /// List pets ordered by owner, then name
    ListPets,

    /// Book a visit; defaults to tomorrow morning when --at is omitted
    BookVisit {
        #[arg(long, value_parser = parse_pet_id)]
        pet: PetId,
        #[arg(long, value_parser = parse_datetime)]
        at: Option<NaiveDateTime>,
        #[arg(long)]
        reason: Option<String>,
    },

    ListVisits {
        #[arg(long, value_parser = parse_pet_id)]
        pet: Option<PetId>,
    },

    /// Show the time proposed when booking without --at
    DefaultVisitTime,

    /// Delete every visit, pet and owner
    Teardown {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

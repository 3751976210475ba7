use clap::Parser;
use pet_clinic::config::StorageKind;
use pet_clinic::utils::error::ErrorSeverity;
use pet_clinic::utils::{logger, validation::Validate};
use pet_clinic::{
    Cli, ClinicConfig, ClinicError, ClinicService, Clock, Command, FileRepository,
    InMemoryRepository, LocalStorage, PetChanges, Repository, SystemClock,
};
use serde::Serialize;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match ClinicConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file is valid TOML");
            std::process::exit(1);
        }
    };

    logger::init_logger(config.log_format(), cli.verbose, config.log_level());
    tracing::info!("🚀 Starting pet-clinic for {}", config.clinic.name);
    if cli.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = execute(cli, &config).await {
        if e.is_validation() {
            tracing::warn!("Request rejected: {}", e);
        } else {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
        }

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn execute(cli: Cli, config: &ClinicConfig) -> pet_clinic::Result<()> {
    match config.storage.kind {
        StorageKind::Memory => {
            tracing::warn!("In-memory storage selected; records are discarded on exit");
            let service = ClinicService::new(InMemoryRepository::new(), SystemClock)
                .with_rules(config.booking_rules());
            run(&service, cli.command, cli.json).await
        }
        StorageKind::File => {
            let storage = LocalStorage::new(config.storage_path());
            let repository = FileRepository::open(storage, config.data_file_name()).await?;
            let service =
                ClinicService::new(repository, SystemClock).with_rules(config.booking_rules());
            run(&service, cli.command, cli.json).await
        }
    }
}

fn emit<T: Serialize>(json: bool, value: &T, human: impl FnOnce()) -> pet_clinic::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human();
    }
    Ok(())
}

async fn run<R: Repository, C: Clock>(
    service: &ClinicService<R, C>,
    command: Command,
    json: bool,
) -> pet_clinic::Result<()> {
    match command {
        Command::AddOwner { name } => {
            let owner = service.register_owner(name).await?;
            emit(json, &owner, || println!("✅ Owner #{} {}", owner.id, owner.name))
        }
        Command::AddPet {
            owner,
            name,
            species,
            notes,
        } => {
            let pet = service.register_pet(owner, name, species, notes).await?;
            emit(json, &pet, || println!("✅ Pet #{} {}", pet.id(), pet.title()))
        }
        Command::EditPet {
            id,
            name,
            notes,
            clear_notes,
        } => {
            let notes = if clear_notes { Some(None) } else { notes.map(Some) };
            let pet = service.update_pet(id, PetChanges { name, notes }).await?;
            emit(json, &pet, || println!("✅ Pet #{} {}", pet.id(), pet.title()))
        }
        Command::ListOwners => {
            let owners = service.owners().await?;
            emit(json, &owners, || {
                for owner in &owners {
                    println!("{:>4}  {}", owner.id, owner.name);
                }
            })
        }
        Command::ListPets => {
            let pets = service.pets().await?;
            emit(json, &pets, || {
                for pet in &pets {
                    match pet.notes() {
                        Some(notes) => println!("{:>4}  {}  [{}]", pet.id(), pet.title(), notes),
                        None => println!("{:>4}  {}", pet.id(), pet.title()),
                    }
                }
            })
        }
        Command::BookVisit { pet, at, reason } => {
            let visit = service.book_visit_for(pet, at, reason).await?;
            emit(json, &visit, || {
                println!(
                    "✅ Visit #{} booked for {} at {}",
                    visit.id(),
                    visit.pet().title(),
                    visit.at().format("%Y-%m-%d %H:%M")
                )
            })
        }
        Command::ListVisits { pet } => {
            let visits = service.visits(pet).await?;
            emit(json, &visits, || {
                for visit in &visits {
                    println!(
                        "{:>4}  {}  {}  {}",
                        visit.id(),
                        visit.at().format("%Y-%m-%d %H:%M"),
                        visit.pet().title(),
                        visit.reason().unwrap_or("-")
                    );
                }
            })
        }
        Command::DefaultVisitTime => {
            let at = service.default_visit_time();
            emit(json, &at, || println!("{}", at.format("%Y-%m-%dT%H:%M")))
        }
        Command::Teardown { yes } => {
            if !yes {
                return Err(ClinicError::validation(
                    "yes",
                    "Teardown deletes every visit, pet and owner; pass --yes to confirm",
                ));
            }
            let summary = service.teardown().await?;
            emit(json, &summary, || {
                println!(
                    "🧹 Deleted {} visits, {} pets, {} owners",
                    summary.visits, summary.pets, summary.owners
                )
            })
        }
    }
}

use anyhow::Result;
use chrono::NaiveDate;
use pet_clinic::{
    ClinicConfig, ClinicService, FileRepository, FixedClock, LocalStorage, PetSpecies,
};
use tempfile::TempDir;

fn clock() -> FixedClock {
    FixedClock::new(
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap(),
    )
}

#[tokio::test]
async fn test_records_survive_reopening() -> Result<()> {
    let temp_dir = TempDir::new()?;

    {
        let repo = FileRepository::open(LocalStorage::new(temp_dir.path()), "clinic.json").await?;
        let clinic = ClinicService::new(repo, clock());

        let maria = clinic.register_owner("Maria").await?;
        let rex = clinic
            .register_pet(maria.id, "Rex", PetSpecies::Dog, Some("Good boy".into()))
            .await?;
        clinic.book_visit_for(rex.id(), None, Some("Checkup".into())).await?;
    }

    assert!(temp_dir.path().join("clinic.json").exists());

    let repo = FileRepository::open(LocalStorage::new(temp_dir.path()), "clinic.json").await?;
    let clinic = ClinicService::new(repo, clock());

    let pets = clinic.pets().await?;
    assert_eq!(pets.len(), 1);
    assert_eq!(pets[0].title(), "Rex (dog owned by Maria)");
    assert_eq!(pets[0].notes(), Some("Good boy"));

    let visits = clinic.visits(Some(pets[0].id())).await?;
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].reason(), Some("Checkup"));
    assert_eq!(visits[0].at().format("%Y-%m-%d %H:%M").to_string(), "2024-01-02 09:00");

    // each table keeps its own sequence across a reload
    assert_eq!(pets[0].id().0, 1);
    assert_eq!(visits[0].id().0, 1);
    let bob = clinic.register_owner("Bob").await?;
    assert_eq!(bob.id.0, 2);
    Ok(())
}

#[tokio::test]
async fn test_teardown_is_persisted() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let repo = FileRepository::open(LocalStorage::new(temp_dir.path()), "clinic.json").await?;
    let clinic = ClinicService::new(repo, clock());
    let maria = clinic.register_owner("Maria").await?;
    clinic.register_pet(maria.id, "Rex", PetSpecies::Dog, None).await?;
    clinic.teardown().await?;

    let reopened = FileRepository::open(LocalStorage::new(temp_dir.path()), "clinic.json").await?;
    let clinic = ClinicService::new(reopened, clock());
    assert!(clinic.owners().await?.is_empty());
    assert!(clinic.pets().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_storage_location_comes_from_config() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_dir = temp_dir.path().join("data");

    let config = ClinicConfig::from_toml_str(&format!(
        "[storage]\npath = {:?}\nfile_name = \"records.json\"\n",
        data_dir.to_string_lossy()
    ))?;

    let repo = FileRepository::open(
        LocalStorage::new(config.storage_path()),
        config.data_file_name(),
    )
    .await?;
    let clinic = ClinicService::new(repo, clock()).with_rules(config.booking_rules());
    clinic.register_owner("Maria").await?;

    assert!(data_dir.join("records.json").exists());
    Ok(())
}

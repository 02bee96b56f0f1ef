use super::*;
use crate::db::repositories::LocalRepository;
use crate::models::{Horse, OwnerId};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2024, 6, 1)
}

fn stored(repo: &LocalRepository, id: i64, sex: Sex, dob: NaiveDate) -> Horse {
    let horse = Horse {
        id: HorseId(id),
        name: format!("Horse {}", id),
        description: None,
        date_of_birth: dob,
        sex,
        owner_id: None,
        mother_id: None,
        father_id: None,
    };
    repo.insert_horse_impl(horse.clone());
    horse
}

fn candidate(dob: NaiveDate, sex: Sex) -> HorseCreate {
    HorseCreate {
        name: Some("Wendy".to_string()),
        date_of_birth: Some(dob),
        sex: Some(sex),
        ..Default::default()
    }
}

fn update_of(horse: &Horse) -> HorseUpdate {
    HorseUpdate {
        id: horse.id,
        name: Some(horse.name.clone()),
        description: horse.description.clone(),
        date_of_birth: Some(horse.date_of_birth),
        sex: Some(horse.sex),
        owner_id: horse.owner_id,
        mother_id: horse.mother_id,
        father_id: horse.father_id,
        delete_image: Some(false),
    }
}

#[test]
fn test_report_prefers_errors_over_conflicts() {
    let mut report = ValidationReport::new();
    report.add_conflict("Sex of mother has to be FEMALE");
    report.add_error("Sex is required");

    let err = report.into_result(CREATE_FAILED).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.messages(), ["Sex is required".to_string()]);
}

#[test]
fn test_generations_bounds() {
    assert_eq!(validate_generations(1, 10).unwrap(), 1);
    assert_eq!(validate_generations(10, 10).unwrap(), 10);

    let low = validate_generations(0, 10).unwrap_err();
    assert_eq!(low.messages(), ["Generations must be at minimum 1".to_string()]);

    let high = validate_generations(11, 10).unwrap_err();
    assert!(high.is_validation());
    assert_eq!(high.messages(), ["Generations must not exceed 10".to_string()]);

    let huge = validate_generations(i64::MAX, 10).unwrap_err();
    assert!(huge.is_validation());
}

#[tokio::test]
async fn test_valid_candidate_passes() {
    let repo = LocalRepository::new();
    let owner = repo.store_owner_impl("Ada", "Lovelace", None);
    let mother = stored(&repo, 1, Sex::Female, date(2010, 1, 1));
    let father = stored(&repo, 2, Sex::Male, date(2009, 1, 1));

    let mut horse = candidate(date(2018, 3, 3), Sex::Female);
    horse.owner_id = Some(owner.id);
    horse.mother_id = Some(mother.id);
    horse.father_id = Some(father.id);
    horse.description = Some("Bay mare".to_string());

    let validator = HorseValidator::with_today(&repo, today());
    let report = validator.validate_for_create(&horse).await.unwrap();
    assert!(report.is_valid(), "{:?}", report);
    assert!(validator.check_create(&horse).await.is_ok());
}

#[tokio::test]
async fn test_structural_errors_are_batched() {
    let repo = LocalRepository::new();
    let horse = HorseCreate {
        name: Some(String::new()),
        date_of_birth: Some(date(2030, 1, 1)),
        sex: None,
        ..Default::default()
    };

    let validator = HorseValidator::with_today(&repo, today());
    let err = validator.check_create(&horse).await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(
        err.messages(),
        [
            "Horse name is required and cannot be empty".to_string(),
            "Horse birth date cannot be in the future".to_string(),
            "Sex is required".to_string(),
        ]
    );
    assert_eq!(repo.store_calls(), 0);
}

#[tokio::test]
async fn test_length_limits_count_characters() {
    let repo = LocalRepository::new();
    let validator = HorseValidator::with_today(&repo, today());

    let mut horse = candidate(date(2018, 1, 1), Sex::Male);
    horse.name = Some("é".repeat(MAX_NAME_LENGTH));
    horse.description = Some("x".repeat(MAX_DESCRIPTION_LENGTH));
    assert!(validator.validate_for_create(&horse).await.unwrap().is_valid());

    horse.name = Some("é".repeat(MAX_NAME_LENGTH + 1));
    horse.description = Some("x".repeat(MAX_DESCRIPTION_LENGTH + 1));
    let report = validator.validate_for_create(&horse).await.unwrap();
    assert_eq!(
        report.errors,
        vec![
            "Horse name too long: longer than 255 characters".to_string(),
            "Horse description too long: longer than 4095 characters".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_blank_description_is_rejected() {
    let repo = LocalRepository::new();
    let mut horse = candidate(date(2018, 1, 1), Sex::Male);
    horse.description = Some("   ".to_string());

    let report = HorseValidator::with_today(&repo, today())
        .validate_for_create(&horse)
        .await
        .unwrap();
    assert_eq!(report.errors, vec!["Horse description is given but blank".to_string()]);
}

#[tokio::test]
async fn test_missing_references_are_structural() {
    let repo = LocalRepository::new();
    let mut horse = candidate(date(2018, 1, 1), Sex::Male);
    horse.owner_id = Some(OwnerId(7));
    horse.mother_id = Some(HorseId(8));
    horse.father_id = Some(HorseId(9));

    let err = HorseValidator::with_today(&repo, today())
        .check_create(&horse)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(
        err.messages(),
        [
            "Owner with ID 7 does not exist".to_string(),
            "Mother with ID 8 does not exist".to_string(),
            "Father with ID 9 does not exist".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_male_mother_is_conflict() {
    let repo = LocalRepository::new();
    let stallion = stored(&repo, 1, Sex::Male, date(2010, 1, 1));
    let mut horse = candidate(date(2018, 1, 1), Sex::Female);
    horse.mother_id = Some(stallion.id);

    let err = HorseValidator::with_today(&repo, today())
        .check_create(&horse)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert!(err.messages().contains(&"Sex of mother has to be FEMALE".to_string()));
}

#[tokio::test]
async fn test_parents_must_be_older() {
    let repo = LocalRepository::new();
    let mare = stored(&repo, 1, Sex::Female, date(2018, 1, 1));
    let stallion = stored(&repo, 2, Sex::Male, date(2019, 5, 5));

    let mut horse = candidate(date(2018, 1, 1), Sex::Female);
    horse.mother_id = Some(mare.id);
    horse.father_id = Some(stallion.id);

    let err = HorseValidator::with_today(&repo, today())
        .check_create(&horse)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(
        err.messages(),
        [
            "Mother has to be older than her child".to_string(),
            "Father has to be older than his child".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_age_check_skipped_without_birth_date() {
    let repo = LocalRepository::new();
    let mare = stored(&repo, 1, Sex::Female, date(2018, 1, 1));
    let horse = HorseCreate {
        name: Some("Undated".to_string()),
        sex: Some(Sex::Male),
        mother_id: Some(mare.id),
        ..Default::default()
    };

    let report = HorseValidator::with_today(&repo, today())
        .validate_for_create(&horse)
        .await
        .unwrap();
    assert_eq!(report.errors, vec!["Horse birth date is required".to_string()]);
    assert!(report.conflicts.is_empty());
}

#[tokio::test]
async fn test_conflicts_reported_alongside_errors() {
    let repo = LocalRepository::new();
    let stallion = stored(&repo, 1, Sex::Male, date(2010, 1, 1));
    let mut horse = candidate(date(2018, 1, 1), Sex::Female);
    horse.name = None;
    horse.mother_id = Some(stallion.id);

    let report = HorseValidator::with_today(&repo, today())
        .validate_for_create(&horse)
        .await
        .unwrap();
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.conflicts, vec!["Sex of mother has to be FEMALE".to_string()]);
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let repo = LocalRepository::new();
    repo.set_healthy(false);
    let mut horse = candidate(date(2018, 1, 1), Sex::Female);
    horse.mother_id = Some(HorseId(1));

    let err = HorseValidator::with_today(&repo, today())
        .validate_for_create(&horse)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Repository(_)));
}

#[tokio::test]
async fn test_update_of_missing_horse_is_not_found() {
    let repo = LocalRepository::new();
    let ghost = Horse {
        id: HorseId(99),
        name: "Ghost".to_string(),
        description: None,
        date_of_birth: date(2015, 1, 1),
        sex: Sex::Male,
        owner_id: None,
        mother_id: None,
        father_id: None,
    };

    let err = HorseValidator::with_today(&repo, today())
        .check_update(&update_of(&ghost))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_sex_change_blocked_by_children() {
    let repo = LocalRepository::new();
    let mare = stored(&repo, 1, Sex::Female, date(2010, 1, 1));
    let mut foal = stored(&repo, 2, Sex::Male, date(2016, 1, 1));
    foal.mother_id = Some(mare.id);
    repo.insert_horse_impl(foal);

    let validator = HorseValidator::with_today(&repo, today());

    let mut update = update_of(&mare);
    update.sex = Some(Sex::Male);
    let err = validator.check_update(&update).await.unwrap_err();
    assert!(err.is_conflict());
    assert!(err
        .messages()
        .contains(&"Cannot change sex of a horse that has children".to_string()));

    let mut update = update_of(&mare);
    update.description = Some("Retired".to_string());
    assert!(validator.check_update(&update).await.is_ok());
}

#[tokio::test]
async fn test_sex_change_allowed_without_children() {
    let repo = LocalRepository::new();
    let horse = stored(&repo, 1, Sex::Female, date(2010, 1, 1));

    let mut update = update_of(&horse);
    update.sex = Some(Sex::Male);
    assert!(HorseValidator::with_today(&repo, today())
        .check_update(&update)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_birth_date_must_stay_before_children() {
    let repo = LocalRepository::new();
    let stallion = stored(&repo, 1, Sex::Male, date(2008, 1, 1));
    for (id, dob) in [(2, date(2014, 1, 1)), (3, date(2012, 1, 1))] {
        let mut child = stored(&repo, id, Sex::Female, dob);
        child.father_id = Some(stallion.id);
        repo.insert_horse_impl(child);
    }

    let validator = HorseValidator::with_today(&repo, today());

    let mut update = update_of(&stallion);
    update.date_of_birth = Some(date(2015, 1, 1));
    let err = validator.check_update(&update).await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(
        err.messages(),
        ["Cannot change date of birth to be on or after a child's birth date".to_string()]
    );

    update.date_of_birth = Some(date(2012, 1, 1));
    assert!(validator.check_update(&update).await.unwrap_err().is_conflict());

    update.date_of_birth = Some(date(2011, 12, 31));
    assert!(validator.check_update(&update).await.is_ok());
}

#[tokio::test]
async fn test_update_requires_delete_image() {
    let repo = LocalRepository::new();
    let horse = stored(&repo, 1, Sex::Female, date(2010, 1, 1));

    let mut update = update_of(&horse);
    update.delete_image = None;
    let err = HorseValidator::with_today(&repo, today())
        .check_update(&update)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.messages(), ["Delete image cannot be null".to_string()]);
    assert!(err.to_string().starts_with(UPDATE_FAILED));
}

#[tokio::test]
async fn test_update_missing_parent_is_validation() {
    let repo = LocalRepository::new();
    let horse = stored(&repo, 1, Sex::Female, date(2010, 1, 1));

    let mut update = update_of(&horse);
    update.father_id = Some(HorseId(50));
    let err = HorseValidator::with_today(&repo, today())
        .check_update(&update)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.messages(), ["Father with ID 50 does not exist".to_string()]);
}

#[tokio::test]
async fn test_horse_cannot_be_its_own_parent() {
    let repo = LocalRepository::new();
    let mare = stored(&repo, 1, Sex::Female, date(2010, 1, 1));
    let validator = HorseValidator::with_today(&repo, today());

    // A later birth date would pass an age check against the stored record.
    let mut update = update_of(&mare);
    update.date_of_birth = Some(date(2012, 1, 1));
    update.mother_id = Some(mare.id);
    let report = validator.validate_for_update(&update).await.unwrap();
    assert!(report.errors.is_empty());
    assert_eq!(report.conflicts, vec!["Horse cannot be its own mother".to_string()]);

    let mut update = update_of(&mare);
    update.father_id = Some(mare.id);
    let report = validator.validate_for_update(&update).await.unwrap();
    assert_eq!(report.conflicts, vec!["Horse cannot be its own father".to_string()]);
}

#[test]
fn test_search_parameters_are_batched() {
    let search = HorseSearch {
        name: Some("n".repeat(MAX_NAME_LENGTH + 1)),
        description: Some("d".repeat(MAX_DESCRIPTION_LENGTH + 1)),
        owner_name: Some("o".repeat(MAX_NAME_LENGTH + 1)),
        ..Default::default()
    };
    let err = validate_for_search(&search).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(
        err.messages(),
        [
            "Search name too long: must be 255 characters or fewer".to_string(),
            "Search description too long: must be 4095 characters or fewer".to_string(),
            "Owner name too long: must be 255 characters or fewer".to_string(),
            "Search limit is required".to_string(),
        ]
    );

    let zero = HorseSearch {
        limit: Some(0),
        ..Default::default()
    };
    assert_eq!(
        validate_for_search(&zero).unwrap_err().messages(),
        ["Search limit must be greater or equal to 1".to_string()]
    );

    let ok = HorseSearch {
        name: Some("é".repeat(MAX_NAME_LENGTH)),
        limit: Some(1),
        ..Default::default()
    };
    assert!(validate_for_search(&ok).is_ok());
}

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::NaiveDate;
use horse_registry::db::repositories::LocalRepository;
use horse_registry::models::{HorseCreate, HorseDetail, HorseId, Sex};
use horse_registry::services;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn candidate(name: &str, dob: NaiveDate, sex: Sex) -> HorseCreate {
    HorseCreate {
        name: Some(name.to_string()),
        date_of_birth: Some(dob),
        sex: Some(sex),
        ..Default::default()
    }
}

pub fn with_parents(
    mut horse: HorseCreate,
    mother: Option<HorseId>,
    father: Option<HorseId>,
) -> HorseCreate {
    horse.mother_id = mother;
    horse.father_id = father;
    horse
}

/// Three generations created through the validated write path.
pub struct Family {
    pub granddam: HorseDetail,
    pub grandsire: HorseDetail,
    pub dam: HorseDetail,
    pub sire: HorseDetail,
    pub foal: HorseDetail,
}

pub async fn seed_family(repo: &LocalRepository) -> Family {
    let granddam = services::create_horse(repo, candidate("Granddam", date(2000, 4, 1), Sex::Female))
        .await
        .unwrap();
    let grandsire = services::create_horse(repo, candidate("Grandsire", date(1999, 5, 1), Sex::Male))
        .await
        .unwrap();
    let dam = services::create_horse(
        repo,
        with_parents(
            candidate("Dam", date(2008, 3, 10), Sex::Female),
            Some(granddam.id),
            Some(grandsire.id),
        ),
    )
    .await
    .unwrap();
    let sire = services::create_horse(repo, candidate("Sire", date(2007, 6, 2), Sex::Male))
        .await
        .unwrap();
    let foal = services::create_horse(
        repo,
        with_parents(
            candidate("Foal", date(2016, 2, 20), Sex::Male),
            Some(dam.id),
            Some(sire.id),
        ),
    )
    .await
    .unwrap();

    Family {
        granddam,
        grandsire,
        dam,
        sire,
        foal,
    }
}

//! Storage initialization
//!
//! First-run setup and the default user directory.

use chrono::NaiveDate;
use tracing::info;

use crate::config::paths::UserDirPaths;
use crate::error::{UserDirError, UserDirResult};
use crate::models::{User, UserId};

use super::store::EntityStore;
use super::table::Table;

/// (id, forename, surname, email, active, (year, month, day))
type SeedRow = (u64, &'static str, &'static str, &'static str, bool, (i32, u32, u32));

const DEFAULT_USERS: [SeedRow; 11] = [
    (1, "Peter", "Loew", "ploew@example.com", true, (1968, 1, 8)),
    (2, "Benjamin Franklin", "Gates", "bfgates@example.com", true, (1997, 3, 20)),
    (3, "Castor", "Troy", "ctroy@example.com", false, (1990, 4, 5)),
    (4, "Memphis", "Raines", "mraines@example.com", true, (1960, 8, 17)),
    (5, "Stanley", "Goodspeed", "sgodspeed@example.com", true, (1991, 12, 24)),
    (6, "H.I.", "McDunnough", "himcdunnough@example.com", true, (1994, 8, 25)),
    (7, "Cameron", "Poe", "cpoe@example.com", false, (1998, 5, 4)),
    (8, "Edward", "Malus", "emalus@example.com", false, (1986, 2, 15)),
    (9, "Damon", "Macready", "dmacready@example.com", false, (2002, 2, 2)),
    (10, "Johnny", "Blaze", "jblaze@example.com", true, (1975, 6, 12)),
    (11, "Robin", "Feld", "rfeld@example.com", true, (2011, 11, 11)),
];

/// Initialize storage for a fresh installation
pub fn initialize_storage(paths: &UserDirPaths, users: &Table<User>) -> UserDirResult<usize> {
    paths.ensure_directories()?;
    seed_default_users(users)
}

/// Populate an empty user table with the default directory.
///
/// Seed rows are reference data, not user edits, so they produce no audit
/// records. Returns the number of users inserted (0 if the table already had
/// rows).
pub fn seed_default_users(users: &Table<User>) -> UserDirResult<usize> {
    if users.count()? > 0 {
        return Ok(0);
    }

    for (id, forename, surname, email, is_active, (y, m, d)) in DEFAULT_USERS {
        let date_of_birth = NaiveDate::from_ymd_opt(y, m, d)
            .ok_or_else(|| UserDirError::Config(format!("Invalid seed date for user {}", id)))?;

        let mut user = User::new(forename, surname, email)
            .with_active(is_active)
            .with_date_of_birth(date_of_birth);
        user.id = UserId::new(id);

        users.create(user)?;
    }

    info!(count = DEFAULT_USERS.len(), "seeded default users");
    Ok(DEFAULT_USERS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_table() -> (TempDir, UserDirPaths, Table<User>) {
        let temp_dir = TempDir::new().unwrap();
        let paths = UserDirPaths::with_base_dir(temp_dir.path().to_path_buf());
        let table = Table::new(paths.users_file());
        table.load().unwrap();
        (temp_dir, paths, table)
    }

    #[test]
    fn test_initialize_seeds_defaults() {
        let (_temp_dir, paths, table) = create_test_table();

        let inserted = initialize_storage(&paths, &table).unwrap();
        assert_eq!(inserted, 11);

        let users = table.get_all().unwrap();
        assert_eq!(users[0].full_name(), "Peter Loew");
        assert_eq!(users[0].id, UserId::new(1));
        assert_eq!(users.iter().filter(|u| u.is_active).count(), 7);
        assert!(paths.users_file().exists());
    }

    #[test]
    fn test_seed_is_idempotent() {
        let (_temp_dir, _paths, table) = create_test_table();

        seed_default_users(&table).unwrap();
        assert_eq!(seed_default_users(&table).unwrap(), 0);
        assert_eq!(table.count().unwrap(), 11);
    }

    #[test]
    fn test_seed_skips_non_empty_table() {
        let (_temp_dir, _paths, table) = create_test_table();

        table
            .create(User::new("Alice", "New", "alice.new@example.com"))
            .unwrap();

        assert_eq!(seed_default_users(&table).unwrap(), 0);
        assert_eq!(table.count().unwrap(), 1);
    }

    #[test]
    fn test_seeded_users_are_valid() {
        let (_temp_dir, _paths, table) = create_test_table();
        seed_default_users(&table).unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
        for user in table.get_all().unwrap() {
            assert!(user.validate_as_of(today).is_ok(), "{} is invalid", user);
        }
    }
}

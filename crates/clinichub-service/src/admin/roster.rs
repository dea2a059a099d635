//! Staff account seeding.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use clinichub_auth::{PasswordHasher, PasswordValidator};
use clinichub_core::AppResult;
use clinichub_database::UserStore;
use clinichub_entity::user::model::normalize_email;
use clinichub_entity::user::{CreateUser, UserRole};

use crate::auth::service::hash_blocking;
use crate::validation;

/// One account to create or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffSeed {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedStatus {
    Created,
    Updated,
}

/// What happened to one seeded account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedOutcome {
    pub email: String,
    pub role: UserRole,
    pub status: SeedStatus,
}

/// Upserts staff accounts by email.
#[derive(Clone)]
pub struct StaffRoster {
    users: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
}

impl std::fmt::Debug for StaffRoster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaffRoster").finish_non_exhaustive()
    }
}

impl StaffRoster {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
    ) -> Self {
        Self {
            users,
            hasher,
            validator,
        }
    }

    /// Demo roster: two accounts for each clinical role.
    pub fn default_seeds() -> Vec<StaffSeed> {
        [
            ("Admin User", "admin@healthcare.com", "admin123", UserRole::Admin),
            ("Admin Manager", "admin2@healthcare.com", "admin456", UserRole::Admin),
            ("Dr. Smith", "doctor@healthcare.com", "doctor123", UserRole::Doctor),
            ("Dr. Johnson", "doctor2@healthcare.com", "doctor456", UserRole::Doctor),
            ("Nurse Williams", "nurse@healthcare.com", "nurse123", UserRole::Nurse),
            ("Nurse Brown", "nurse2@healthcare.com", "nurse456", UserRole::Nurse),
            (
                "Receptionist Davis",
                "receptionist@healthcare.com",
                "receptionist123",
                UserRole::Receptionist,
            ),
            (
                "Receptionist Wilson",
                "receptionist2@healthcare.com",
                "receptionist456",
                UserRole::Receptionist,
            ),
            (
                "Pharmacist Taylor",
                "pharmacist@healthcare.com",
                "pharmacist123",
                UserRole::Pharmacist,
            ),
            (
                "Pharmacist Anderson",
                "pharmacist2@healthcare.com",
                "pharmacist456",
                UserRole::Pharmacist,
            ),
        ]
        .into_iter()
        .map(|(name, email, password, role)| StaffSeed {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
        })
        .collect()
    }

    /// Create missing accounts; reset name, password, role and active flag
    /// of existing ones.
    pub async fn seed(&self, seeds: Vec<StaffSeed>) -> AppResult<Vec<SeedOutcome>> {
        let mut outcomes = Vec::with_capacity(seeds.len());

        for seed in seeds {
            let email = normalize_email(&seed.email);
            validation::require_email(&email)?;
            self.validator.validate(&seed.password)?;

            let data = CreateUser {
                email: email.clone(),
                name: seed.name.trim().to_string(),
                password_hash: hash_blocking(&self.hasher, seed.password).await?,
                role: seed.role,
                is_active: true,
            };

            let status = match self.users.find_by_email(&email).await? {
                Some(existing) => {
                    self.users.replace_credentials(existing.id, &data).await?;
                    SeedStatus::Updated
                }
                None => {
                    self.users.create(&data).await?;
                    SeedStatus::Created
                }
            };

            info!(email = %email, role = %seed.role, ?status, "Seeded staff account");
            outcomes.push(SeedOutcome {
                email,
                role: seed.role,
                status,
            });
        }

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use clinichub_database::Stores;

    use super::*;

    fn roster(stores: &Stores) -> StaffRoster {
        StaffRoster::new(
            stores.users.clone(),
            Arc::new(PasswordHasher::new(8, 1, 1).unwrap()),
            Arc::new(PasswordValidator::new(6, 128)),
        )
    }

    #[test]
    fn test_default_roster_covers_clinical_roles() {
        let seeds = StaffRoster::default_seeds();
        assert_eq!(seeds.len(), 10);
        for role in [
            UserRole::Admin,
            UserRole::Doctor,
            UserRole::Nurse,
            UserRole::Receptionist,
            UserRole::Pharmacist,
        ] {
            assert_eq!(seeds.iter().filter(|s| s.role == role).count(), 2);
        }
    }

    #[tokio::test]
    async fn test_seed_is_an_upsert() {
        let stores = Stores::in_memory();
        let roster = roster(&stores);
        let seed = StaffSeed {
            name: "Dr. Smith".into(),
            email: "Doctor@Healthcare.com".into(),
            password: "doctor123".into(),
            role: UserRole::Doctor,
        };

        let first = roster.seed(vec![seed.clone()]).await.unwrap();
        assert_eq!(first[0].status, SeedStatus::Created);
        assert_eq!(first[0].email, "doctor@healthcare.com");

        let promoted = StaffSeed {
            role: UserRole::Admin,
            ..seed
        };
        let second = roster.seed(vec![promoted]).await.unwrap();
        assert_eq!(second[0].status, SeedStatus::Updated);
        assert_eq!(stores.users.count().await.unwrap(), 1);

        let user = stores
            .users
            .find_by_email("doctor@healthcare.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, UserRole::Admin);
    }
}

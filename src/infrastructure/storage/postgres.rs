//! PostgreSQL storage implementation with connection pooling

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

use crate::domain::invite::{Invite, InviteId, InviteRepository};
use crate::domain::membership::MembershipRepository;
use crate::domain::profile::{Profile, ProfileRepository};
use crate::domain::storage::StorageHealth;
use crate::domain::team::{Team, TeamId, TeamRepository, TeamRole};
use crate::domain::user::UserId;
use crate::domain::DomainError;

const INVITE_COLUMNS: &str =
    "id, team_id, email, token_hash, expires_at, used_at, created_by, created_at";
const PROFILE_COLUMNS: &str = "id, team_id, role, email, name, created_at, updated_at";

/// PostgreSQL storage configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/teamform".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// Connect a pool using the given configuration
pub async fn connect_pool(config: &PostgresConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(std::time::Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
}

/// PostgreSQL store for teams, profiles and invites
///
/// Membership changes run inside a single transaction.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|e| e.is_foreign_key_violation())
        .unwrap_or(false)
}

fn row_to_team(row: &PgRow) -> Result<Team, DomainError> {
    let id: Uuid = row.get("id");
    let name: String = row.get("name");
    let owner_id: String = row.get("owner_id");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");

    let owner_id = UserId::new(owner_id)
        .map_err(|e| DomainError::storage(format!("Invalid owner ID in database: {}", e)))?;

    Ok(Team::restore(
        TeamId::from(id),
        name,
        owner_id,
        created_at,
        updated_at,
    ))
}

fn row_to_profile(row: &PgRow) -> Result<Profile, DomainError> {
    let id: String = row.get("id");
    let team_id: Option<Uuid> = row.get("team_id");
    let role: String = row.get("role");
    let email: Option<String> = row.get("email");
    let name: Option<String> = row.get("name");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");

    let id = UserId::new(id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;
    let role = TeamRole::parse(&role)
        .ok_or_else(|| DomainError::storage(format!("Invalid role in database: {}", role)))?;

    Ok(Profile::restore(
        id,
        team_id.map(TeamId::from),
        role,
        email,
        name,
        created_at,
        updated_at,
    ))
}

fn row_to_invite(row: &PgRow) -> Result<Invite, DomainError> {
    let id: Uuid = row.get("id");
    let team_id: Uuid = row.get("team_id");
    let email: String = row.get("email");
    let token_hash: String = row.get("token_hash");
    let expires_at: DateTime<Utc> = row.get("expires_at");
    let used_at: Option<DateTime<Utc>> = row.get("used_at");
    let created_by: String = row.get("created_by");
    let created_at: DateTime<Utc> = row.get("created_at");

    let created_by = UserId::new(created_by)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(Invite::restore(
        InviteId::from(id),
        TeamId::from(team_id),
        email,
        token_hash,
        expires_at,
        used_at,
        created_by,
        created_at,
    ))
}

#[async_trait]
impl TeamRepository for PostgresStore {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, owner_id, created_at, updated_at FROM teams WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get team: {}", e)))?;

        row.as_ref().map(row_to_team).transpose()
    }
}

#[async_trait]
impl ProfileRepository for PostgresStore {
    async fn get(&self, id: &UserId) -> Result<Option<Profile>, DomainError> {
        let query = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get profile: {}", e)))?;

        row.as_ref().map(row_to_profile).transpose()
    }

    async fn insert(&self, profile: Profile) -> Result<Profile, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, team_id, role, email, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(profile.id().as_str())
        .bind(profile.team_id().map(TeamId::as_uuid))
        .bind(profile.role().as_str())
        .bind(profile.email())
        .bind(profile.name())
        .bind(profile.created_at())
        .bind(profile.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(format!("Profile '{}' already exists", profile.id()))
            } else {
                DomainError::storage(format!("Failed to create profile: {}", e))
            }
        })?;

        Ok(profile)
    }

    async fn count_by_team(&self, team_id: &TeamId) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE team_id = $1")
            .bind(team_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count team members: {}", e)))?;

        Ok(count as usize)
    }
}

#[async_trait]
impl InviteRepository for PostgresStore {
    async fn insert(&self, invite: Invite) -> Result<Invite, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO invites (id, team_id, email, token_hash, expires_at, used_at,
                                 created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(invite.id().as_uuid())
        .bind(invite.team_id().as_uuid())
        .bind(invite.email())
        .bind(invite.token_hash())
        .bind(invite.expires_at())
        .bind(invite.used_at())
        .bind(invite.created_by().as_str())
        .bind(invite.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict("Invite token already exists")
            } else if is_foreign_key_violation(&e) {
                DomainError::not_found(format!("Team '{}' not found", invite.team_id()))
            } else {
                DomainError::storage(format!("Failed to create invite: {}", e))
            }
        })?;

        Ok(invite)
    }

    async fn get(&self, id: &InviteId) -> Result<Option<Invite>, DomainError> {
        let query = format!("SELECT {} FROM invites WHERE id = $1", INVITE_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get invite: {}", e)))?;

        row.as_ref().map(row_to_invite).transpose()
    }

    async fn find_redeemable_by_token_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Invite>, DomainError> {
        let query = format!(
            r#"
            SELECT {}
            FROM invites
            WHERE token_hash = $1 AND used_at IS NULL AND expires_at > $2
            "#,
            INVITE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(token_hash)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to look up invite: {}", e)))?;

        row.as_ref().map(row_to_invite).transpose()
    }
}

#[async_trait]
impl MembershipRepository for PostgresStore {
    async fn create_team(&self, team: Team, manager: Profile) -> Result<(Team, Profile), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO teams (id, name, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(team.id().as_uuid())
        .bind(team.name())
        .bind(team.owner_id().as_str())
        .bind(team.created_at())
        .bind(team.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(format!("Team '{}' already exists", team.id()))
            } else {
                DomainError::storage(format!("Failed to create team: {}", e))
            }
        })?;

        let result = sqlx::query(
            "UPDATE profiles SET team_id = $2, role = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(manager.id().as_str())
        .bind(manager.team_id().map(TeamId::as_uuid))
        .bind(manager.role().as_str())
        .bind(manager.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update profile: {}", e)))?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls back the team insert
            return Err(DomainError::not_found(format!(
                "Profile '{}' not found",
                manager.id()
            )));
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit team creation: {}", e)))?;

        Ok((team, manager))
    }

    async fn redeem_invite(
        &self,
        invite_id: &InviteId,
        member: Profile,
        now: DateTime<Utc>,
    ) -> Result<Option<(Invite, Profile)>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let query = format!(
            r#"
            UPDATE invites
            SET used_at = $2
            WHERE id = $1 AND used_at IS NULL AND expires_at > $2
            RETURNING {}
            "#,
            INVITE_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(invite_id.as_uuid())
            .bind(now)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to mark invite used: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let invite = row_to_invite(&row)?;

        let result = sqlx::query(
            "UPDATE profiles SET team_id = $2, role = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(member.id().as_str())
        .bind(member.team_id().map(TeamId::as_uuid))
        .bind(member.role().as_str())
        .bind(member.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update profile: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Profile '{}' not found",
                member.id()
            )));
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit redemption: {}", e)))?;

        Ok(Some((invite, member)))
    }
}

#[async_trait]
impl StorageHealth for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Database ping failed: {}", e)))?;

        Ok(())
    }
}

//! # Partner Repository
//!
//! Database operations for customers and suppliers.
//!
//! Partners carry a running balance in cents:
//! - Positive balance on a customer means they owe the shop.
//! - Negative balance on a supplier means the shop owes them.
//!
//! Checkout adjusts the balance with the same unlocked read-then-write
//! pattern used for stock (see the product repository).

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use khalkhal_core::{Partner, PartnerRole};

const PARTNER_COLUMNS: &str = "id, name, phone, role, balance_cents, created_at";

/// Repository for partner database operations.
#[derive(Debug, Clone)]
pub struct PartnerRepository {
    pool: SqlitePool,
}

impl PartnerRepository {
    /// Creates a new PartnerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PartnerRepository { pool }
    }

    /// Lists partners, newest first, optionally filtered by role.
    pub async fn list(&self, role: Option<PartnerRole>) -> DbResult<Vec<Partner>> {
        debug!(role = ?role, "Listing partners");

        let partners = match role {
            Some(role) => {
                sqlx::query_as::<_, Partner>(&format!(
                    "SELECT {PARTNER_COLUMNS} FROM partners \
                     WHERE role = ? \
                     ORDER BY created_at DESC"
                ))
                .bind(role)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Partner>(&format!(
                    "SELECT {PARTNER_COLUMNS} FROM partners ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(partners)
    }

    /// Gets a partner by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Partner>> {
        let partner = sqlx::query_as::<_, Partner>(&format!(
            "SELECT {PARTNER_COLUMNS} FROM partners WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(partner)
    }

    /// Inserts a new partner.
    pub async fn insert(&self, partner: &Partner) -> DbResult<()> {
        debug!(id = %partner.id, name = %partner.name, "Inserting partner");

        sqlx::query(
            "INSERT INTO partners (id, name, phone, role, balance_cents, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&partner.id)
        .bind(&partner.name)
        .bind(&partner.phone)
        .bind(partner.role)
        .bind(partner.balance_cents)
        .bind(partner.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing partner.
    ///
    /// Writes every mutable column, including the balance: the edit screen
    /// allows manual balance corrections.
    pub async fn update(&self, partner: &Partner) -> DbResult<()> {
        debug!(id = %partner.id, "Updating partner");

        let result = sqlx::query(
            "UPDATE partners SET
                name = ?,
                phone = ?,
                role = ?,
                balance_cents = ?
            WHERE id = ?",
        )
        .bind(&partner.name)
        .bind(&partner.phone)
        .bind(partner.role)
        .bind(partner.balance_cents)
        .bind(&partner.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Partner", &partner.id));
        }

        Ok(())
    }

    /// Deletes a partner.
    ///
    /// Hard delete: invoices keep their partner name snapshot, so history
    /// survives the deletion.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting partner");

        let result = sqlx::query("DELETE FROM partners WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Partner", id));
        }

        Ok(())
    }

    /// Reads the current balance of a partner.
    ///
    /// Returns `None` when the partner no longer exists (checkout skips
    /// the balance step for such invoices instead of failing).
    pub async fn get_balance(&self, id: &str) -> DbResult<Option<i64>> {
        let balance: Option<i64> =
            sqlx::query_scalar("SELECT balance_cents FROM partners WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(balance)
    }

    /// Writes an absolute balance.
    ///
    /// Same last-writer-wins caveat as `ProductRepository::set_stock`.
    pub async fn set_balance(&self, id: &str, balance_cents: i64) -> DbResult<()> {
        debug!(id = %id, balance_cents = %balance_cents, "Writing partner balance");

        let result = sqlx::query("UPDATE partners SET balance_cents = ? WHERE id = ?")
            .bind(balance_cents)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Partner", id));
        }

        Ok(())
    }

    /// Counts partners (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM partners")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new partner ID.
pub fn generate_partner_id() -> String {
    Uuid::new_v4().to_string()
}

//! # Support Ticket Repository
//!
//! Database operations for customer support tickets.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use tavshil_core::{SupportTicket, TicketStatus};

#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: String,
    customer_email: String,
    subject: String,
    message: String,
    status: TicketStatus,
    admin_reply: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TicketRow> for SupportTicket {
    fn from(row: TicketRow) -> Self {
        SupportTicket {
            id: row.id,
            customer_email: row.customer_email,
            subject: row.subject,
            message: row.message,
            status: row.status,
            admin_reply: row.admin_reply,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_TICKET: &str = r#"
    SELECT id, customer_email, subject, message, status, admin_reply,
           created_at, updated_at
    FROM support_tickets
"#;

/// Repository for support ticket database operations.
#[derive(Debug, Clone)]
pub struct SupportTicketRepository {
    pool: SqlitePool,
}

impl SupportTicketRepository {
    /// Creates a new SupportTicketRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupportTicketRepository { pool }
    }

    /// Inserts a new ticket.
    pub async fn insert(&self, ticket: &SupportTicket) -> DbResult<()> {
        debug!(id = %ticket.id, customer = %ticket.customer_email, "Inserting support ticket");

        sqlx::query(
            r#"
            INSERT INTO support_tickets (
                id, customer_email, subject, message, status, admin_reply,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&ticket.id)
        .bind(&ticket.customer_email)
        .bind(&ticket.subject)
        .bind(&ticket.message)
        .bind(ticket.status)
        .bind(&ticket.admin_reply)
        .bind(ticket.created_at)
        .bind(ticket.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a ticket by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SupportTicket>> {
        let row: Option<TicketRow> = sqlx::query_as(&format!("{SELECT_TICKET} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(SupportTicket::from))
    }

    /// A customer's tickets, newest first.
    pub async fn list_for_customer(&self, customer_email: &str) -> DbResult<Vec<SupportTicket>> {
        let rows: Vec<TicketRow> = sqlx::query_as(&format!(
            "{SELECT_TICKET} WHERE customer_email = ?1 ORDER BY created_at DESC"
        ))
        .bind(customer_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SupportTicket::from).collect())
    }

    /// All tickets, newest first (admin view).
    pub async fn list_all(&self, limit: u32) -> DbResult<Vec<SupportTicket>> {
        let rows: Vec<TicketRow> = sqlx::query_as(&format!(
            "{SELECT_TICKET} ORDER BY created_at DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SupportTicket::from).collect())
    }

    /// Moves a ticket to a new workflow status.
    pub async fn set_status(&self, id: &str, status: TicketStatus) -> DbResult<()> {
        let now = Utc::now();

        let result =
            sqlx::query("UPDATE support_tickets SET status = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(id)
                .bind(status)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("SupportTicket", id));
        }

        Ok(())
    }

    /// Stores the admin's reply and closes the ticket.
    pub async fn resolve(&self, id: &str, admin_reply: &str) -> DbResult<()> {
        debug!(id = %id, "Resolving support ticket");
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE support_tickets
            SET status = 'resolved', admin_reply = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(admin_reply)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("SupportTicket", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

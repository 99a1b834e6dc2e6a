//! # Support Service
//!
//! Customer support ticket workflow:
//! `Open → InProgress → Resolved`, with the admin reply stored on
//! resolution.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use tavshil_core::{validation, CoreError, SupportTicket, TicketStatus};
use tavshil_db::Database;

/// Support ticket service.
#[derive(Debug, Clone)]
pub struct SupportService {
    db: Database,
}

impl SupportService {
    /// Creates a new SupportService.
    pub fn new(db: Database) -> Self {
        SupportService { db }
    }

    /// Opens a new ticket.
    pub async fn open_ticket(
        &self,
        customer_email: &str,
        subject: &str,
        message: &str,
    ) -> ServiceResult<SupportTicket> {
        validation::validate_email(customer_email).map_err(CoreError::from)?;
        validation::validate_title("subject", subject).map_err(CoreError::from)?;
        if message.trim().is_empty() {
            return Err(ServiceError::validation("message is required"));
        }

        let now = Utc::now();
        let ticket = SupportTicket {
            id: Uuid::new_v4().to_string(),
            customer_email: customer_email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
            status: TicketStatus::Open,
            admin_reply: None,
            created_at: now,
            updated_at: now,
        };
        self.db.support_tickets().insert(&ticket).await?;

        info!(ticket_id = %ticket.id, "Support ticket opened");
        Ok(ticket)
    }

    /// A customer's tickets, newest first.
    pub async fn my_tickets(&self, customer_email: &str) -> ServiceResult<Vec<SupportTicket>> {
        Ok(self
            .db
            .support_tickets()
            .list_for_customer(customer_email)
            .await?)
    }

    /// All tickets for the admin console.
    pub async fn all_tickets(&self, limit: u32) -> ServiceResult<Vec<SupportTicket>> {
        Ok(self.db.support_tickets().list_all(limit).await?)
    }

    /// Marks a ticket as being handled.
    pub async fn start_progress(&self, ticket_id: &str) -> ServiceResult<()> {
        self.db
            .support_tickets()
            .set_status(ticket_id, TicketStatus::InProgress)
            .await?;
        Ok(())
    }

    /// Resolves a ticket with the admin's reply.
    pub async fn resolve(&self, ticket_id: &str, reply: &str) -> ServiceResult<()> {
        if reply.trim().is_empty() {
            return Err(ServiceError::validation("reply is required"));
        }

        self.db.support_tickets().resolve(ticket_id, reply).await?;

        info!(ticket_id = %ticket_id, "Support ticket resolved");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

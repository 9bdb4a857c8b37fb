use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{
    auth::UserID,
    database_id::TransactionId,
    transaction::{Transaction, TransactionType},
};

/// The denormalized copy of a [Transaction] kept in the mirror store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorRecord {
    /// The identifier shared with the primary store.
    pub mirror_id: Uuid,
    /// The ID of the transaction in the primary store.
    pub transaction_id: TransactionId,
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// How the money was paid.
    pub payment_mode: String,
    /// The amount of money spent or earned.
    pub amount: Decimal,
    /// The name of the category.
    pub category: String,
    /// What the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// When the transaction was recorded in the primary store.
    pub created_at: OffsetDateTime,
}

impl From<&Transaction> for MirrorRecord {
    fn from(transaction: &Transaction) -> Self {
        Self {
            mirror_id: transaction.mirror_id,
            transaction_id: transaction.id,
            user_id: transaction.user_id,
            transaction_type: transaction.transaction_type,
            payment_mode: transaction.payment_mode.clone(),
            amount: transaction.amount,
            category: transaction.category.clone(),
            description: transaction.description.clone(),
            date: transaction.date,
            created_at: transaction.created_at,
        }
    }
}

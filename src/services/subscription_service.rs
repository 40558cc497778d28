use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, DateTime};
use mongodb::{Client, Collection};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::models::subscription::{Subscription, SubscriptionStatus};

const DATABASE: &str = "Tripweaver";
const COLLECTION: &str = "Subscriptions";

#[derive(Debug)]
pub enum SubscriptionError {
    NotSubscribed,
    InvalidId(String),
    Database(mongodb::error::Error),
}

impl fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionError::NotSubscribed => write!(f, "no active subscription"),
            SubscriptionError::InvalidId(id) => write!(f, "invalid id: {}", id),
            SubscriptionError::Database(err) => write!(f, "database error: {}", err),
        }
    }
}

impl Error for SubscriptionError {}

impl From<mongodb::error::Error> for SubscriptionError {
    fn from(err: mongodb::error::Error) -> Self {
        SubscriptionError::Database(err)
    }
}

fn subscriptions(client: &Client) -> Collection<Subscription> {
    client.database(DATABASE).collection(COLLECTION)
}

fn parse_oid(id: &str) -> Result<ObjectId, SubscriptionError> {
    ObjectId::parse_str(id).map_err(|_| SubscriptionError::InvalidId(id.to_string()))
}

/// A missing record reads as inactive; the premium gate treats both the
/// same way.
pub async fn get_status(
    client: &Arc<Client>,
    user_id: &str,
) -> Result<SubscriptionStatus, SubscriptionError> {
    let owner = parse_oid(user_id)?;
    let record = subscriptions(client)
        .find_one(doc! { "user_id": owner })
        .await?;
    Ok(record
        .map(|s| s.status)
        .unwrap_or(SubscriptionStatus::Inactive))
}

/// Gate for premium actions (saving, sharing). Errors when the user has no
/// active subscription.
pub async fn require_active(
    client: &Arc<Client>,
    user_id: &str,
) -> Result<(), SubscriptionError> {
    match get_status(client, user_id).await? {
        SubscriptionStatus::Active => Ok(()),
        SubscriptionStatus::Inactive => Err(SubscriptionError::NotSubscribed),
    }
}

/// Marks the user's subscription active, recording the Stripe bookkeeping
/// that proved payment. Upserts so webhook and verify paths converge.
pub async fn activate(
    client: &Arc<Client>,
    user_id: &str,
    stripe_customer_id: Option<String>,
    checkout_session_id: Option<String>,
) -> Result<(), SubscriptionError> {
    let owner = parse_oid(user_id)?;
    let now = DateTime::now();

    let update = doc! {
        "$set": {
            "status": "active",
            "stripe_customer_id": stripe_customer_id,
            "checkout_session_id": checkout_session_id,
            "updated_at": now,
        },
        "$setOnInsert": { "user_id": owner, "created_at": now },
    };

    subscriptions(client)
        .update_one(doc! { "user_id": owner }, update)
        .upsert(true)
        .await?;
    Ok(())
}

/// Webhook path: cancellation events identify the user only by Stripe
/// customer id.
pub async fn deactivate_by_customer(
    client: &Arc<Client>,
    stripe_customer_id: &str,
) -> Result<(), SubscriptionError> {
    subscriptions(client)
        .update_one(
            doc! { "stripe_customer_id": stripe_customer_id },
            doc! { "$set": { "status": "inactive", "updated_at": DateTime::now() } },
        )
        .await?;
    Ok(())
}

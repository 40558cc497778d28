use actix_web::{web, HttpRequest, HttpResponse, Responder};
use mongodb::Client;
use serde::{Deserialize, Serialize};
use std::{str::FromStr, sync::Arc};
use stripe::{
    CheckoutSession, CheckoutSessionId, CheckoutSessionMode, CheckoutSessionPaymentStatus,
    CreateCheckoutSession, CreateCheckoutSessionLineItems, EventObject, EventType, Webhook,
};

use crate::middleware::auth::Claims;
use crate::services::subscription_service;

#[derive(Serialize, Deserialize)]
pub struct CreateCheckoutInput {
    #[serde(rename = "successUrl")]
    pub success_url: String,
    #[serde(rename = "cancelUrl")]
    pub cancel_url: String,
}

#[derive(Clone)]
pub struct StripeConfig {
    pub webhook_secret: String,
    pub price_id: String,
}

fn customer_id(customer: &stripe::Expandable<stripe::Customer>) -> String {
    match customer {
        stripe::Expandable::Id(id) => id.to_string(),
        stripe::Expandable::Object(customer) => customer.id.to_string(),
    }
}

/*
    POST /api/payment/checkout-session
*/
pub async fn create_checkout_session(
    claims: Claims,
    data: web::Data<Arc<stripe::Client>>,
    stripe_config: web::Data<StripeConfig>,
    input: web::Json<CreateCheckoutInput>,
) -> impl Responder {
    let input = input.into_inner();

    let line_items = vec![CreateCheckoutSessionLineItems {
        price: Some(stripe_config.price_id.clone()),
        quantity: Some(1),
        ..Default::default()
    }];

    let mut params = CreateCheckoutSession::new();
    params.mode = Some(CheckoutSessionMode::Subscription);
    params.line_items = Some(line_items);
    params.success_url = Some(&input.success_url);
    params.cancel_url = Some(&input.cancel_url);
    // Ties the hosted session back to our user when it completes.
    params.client_reference_id = Some(&claims.user_id);

    match CheckoutSession::create(data.as_ref(), params).await {
        Ok(session) => HttpResponse::Ok().json(serde_json::json!({
            "sessionId": session.id,
            "url": session.url,
        })),
        Err(e) => {
            log::error!("Error creating checkout session: {:?}", e);
            HttpResponse::InternalServerError().body("Failed to create checkout session")
        }
    }
}

/*
    GET /api/payment/checkout-session/{id}/verify
*/
pub async fn verify_checkout_session(
    claims: Claims,
    data: web::Data<Arc<stripe::Client>>,
    mongo: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let session_id = match CheckoutSessionId::from_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid session ID"),
    };

    let session = match CheckoutSession::retrieve(data.as_ref(), &session_id, &[]).await {
        Ok(session) => session,
        Err(e) => {
            log::error!("Error retrieving checkout session: {:?}", e);
            return HttpResponse::InternalServerError().body("Failed to retrieve session");
        }
    };

    // The session must belong to the caller.
    if session.client_reference_id.as_deref() != Some(claims.user_id.as_str()) {
        return HttpResponse::Forbidden().body("Forbidden");
    }

    if session.payment_status != CheckoutSessionPaymentStatus::Paid {
        return HttpResponse::Ok().json(serde_json::json!({ "status": "unpaid" }));
    }

    let customer_id = session.customer.as_ref().map(customer_id);
    if let Err(e) = subscription_service::activate(
        &mongo.into_inner(),
        &claims.user_id,
        customer_id,
        Some(session.id.to_string()),
    )
    .await
    {
        log::error!("Failed to activate subscription: {}", e);
        return HttpResponse::InternalServerError().body("Failed to activate subscription");
    }

    HttpResponse::Ok().json(serde_json::json!({ "status": "paid" }))
}

/*
    GET /api/payment/subscription  (current gate status for the caller)
*/
pub async fn subscription_status(claims: Claims, mongo: web::Data<Arc<Client>>) -> impl Responder {
    match subscription_service::get_status(&mongo.into_inner(), &claims.user_id).await {
        Ok(status) => HttpResponse::Ok().json(serde_json::json!({ "status": status })),
        Err(e) => {
            log::error!("Subscription lookup failed: {}", e);
            HttpResponse::InternalServerError().body("Failed to check subscription")
        }
    }
}

/*
    POST /stripe/webhook
*/
pub async fn handle_stripe_webhook(
    req: HttpRequest,
    payload: web::Bytes,
    stripe_config: web::Data<StripeConfig>,
    mongo: web::Data<Arc<Client>>,
) -> impl Responder {
    let signature = match req.headers().get("stripe-signature") {
        Some(sig) => sig.to_str().unwrap_or(""),
        None => {
            return HttpResponse::BadRequest().body("Missing stripe-signature header");
        }
    };

    let payload_str = match String::from_utf8(payload.to_vec()) {
        Ok(s) => s,
        Err(_) => {
            return HttpResponse::BadRequest().body("Invalid payload encoding");
        }
    };

    let event =
        match Webhook::construct_event(&payload_str, signature, &stripe_config.webhook_secret) {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Webhook signature verification failed: {:?}", e);
                return HttpResponse::BadRequest().body(format!("Webhook error: {}", e));
            }
        };

    let mongo = mongo.into_inner();

    match event.type_ {
        EventType::CheckoutSessionCompleted => {
            if let EventObject::CheckoutSession(session) = event.data.object {
                if let Some(user_id) = session.client_reference_id {
                    let customer_id = session.customer.as_ref().map(customer_id);
                    if let Err(e) = subscription_service::activate(
                        &mongo,
                        &user_id,
                        customer_id,
                        Some(session.id.to_string()),
                    )
                    .await
                    {
                        log::error!("Webhook activation failed: {}", e);
                    }
                } else {
                    log::warn!("Checkout session {} has no client_reference_id", session.id);
                }
                HttpResponse::Ok().json(serde_json::json!({ "received": true }))
            } else {
                HttpResponse::BadRequest().body("Invalid checkout session object")
            }
        }

        EventType::CustomerSubscriptionDeleted => {
            if let EventObject::Subscription(subscription) = event.data.object {
                let cancelled_customer = customer_id(&subscription.customer);
                if let Err(e) =
                    subscription_service::deactivate_by_customer(&mongo, &cancelled_customer).await
                {
                    log::error!("Webhook deactivation failed: {}", e);
                }
                HttpResponse::Ok().json(serde_json::json!({ "received": true }))
            } else {
                HttpResponse::BadRequest().body("Invalid subscription object")
            }
        }

        _ => {
            log::debug!("Unhandled event type: {:?}", event.type_);
            HttpResponse::Ok().json(serde_json::json!({ "received": true }))
        }
    }
}

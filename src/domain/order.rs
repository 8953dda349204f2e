//! Purchase order entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Certificate, User};

/// Order domain entity. Orders are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub certificate_id: i32,
    pub cost: Decimal,
    pub purchase_date: DateTime<Utc>,
}

/// Input for persisting a new order
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: i32,
    pub certificate_id: i32,
    pub cost: Decimal,
    pub purchase_date: DateTime<Utc>,
}

impl NewOrder {
    /// The order charges the certificate price at the moment of purchase.
    pub fn purchase(user: &User, certificate: &Certificate) -> Self {
        Self {
            user_id: user.id,
            certificate_id: certificate.id,
            cost: certificate.price,
            purchase_date: Utc::now(),
        }
    }
}

/// Order as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReadOrder {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 7)]
    pub user_id: i32,
    #[schema(example = 3)]
    pub certificate_id: i32,
    #[schema(value_type = String, example = "149.99")]
    pub cost: Decimal,
    pub purchase_date: DateTime<Utc>,
}

impl From<Order> for ReadOrder {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            certificate_id: order.certificate_id,
            cost: order.cost,
            purchase_date: order.purchase_date,
        }
    }
}

/// Query of `POST /users/{id}/orders`
#[derive(Debug, Clone, Copy, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PurchaseQuery {
    #[param(example = 3)]
    pub certificate_id: i32,
}

//! Account and token data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account ID type
pub type AccountId = Uuid;

/// Product reference held in a cart or an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub price: i64,
    pub rating: Option<i16>,
    pub image: String,
}

/// Shipping address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub address_id: Uuid,
    pub house: String,
    pub street: String,
    pub city: String,
    pub pincode: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub digital: bool,
    pub cod: bool,
}

/// Placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: Uuid,
    pub items: Vec<CartItem>,
    pub ordered_at: DateTime<Utc>,
    pub total_price: i64,
    pub discount: Option<i64>,
    pub payment_method: PaymentMethod,
}

/// Stored account record.
///
/// Holds the password hash and has no `Serialize` impl. Convert to [`AccountView`]
/// before handing it to a caller.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub token: String,
    pub refresh_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cart: Vec<CartItem>,
    pub addresses: Vec<Address>,
    pub orders: Vec<Order>,
}

/// Account as returned to callers, without the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub token: String,
    pub refresh_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cart: Vec<CartItem>,
    pub addresses: Vec<Address>,
    pub orders: Vec<Order>,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            phone: account.phone,
            token: account.token,
            refresh_token: account.refresh_token,
            created_at: account.created_at,
            updated_at: account.updated_at,
            cart: account.cart,
            addresses: account.addresses,
            orders: account.orders,
        }
    }
}

/// Sign-up candidate.
///
/// Every field is optional at the wire level so that missing fields are reported
/// together as validation errors instead of failing deserialization one at a time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Session and refresh token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub token: String,
    pub refresh_token: String,
}

/// Discriminates the two token kinds so one can never stand in for the other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Session,
    Refresh,
}

/// JWT claims for session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: AccountId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub typ: TokenKind,
    pub jti: Uuid, // Unique per issuance
    pub iat: i64,
    pub exp: i64,
}

/// JWT claims for refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: AccountId,
    pub typ: TokenKind,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_view_drops_password_hash() {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555".to_string(),
            password_hash: "$argon2id$secret-hash".to_string(),
            token: "t".to_string(),
            refresh_token: "r".to_string(),
            created_at: now,
            updated_at: now,
            cart: Vec::new(),
            addresses: Vec::new(),
            orders: Vec::new(),
        };

        let view = AccountView::from(account.clone());
        let json = serde_json::to_string(&view).unwrap();

        assert_eq!(view.id, account.id);
        assert!(!json.contains("password"));
        assert!(!json.contains("secret-hash"));
    }

    #[test]
    fn test_sign_up_request_tolerates_missing_fields() {
        let request: SignUpRequest = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        assert_eq!(request.email.as_deref(), Some("a@x.com"));
        assert!(request.password.is_none());
    }

    #[test]
    fn test_token_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TokenKind::Refresh).unwrap(), "\"refresh\"");
    }
}

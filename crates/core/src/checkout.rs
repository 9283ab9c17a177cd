//! Checkout form validation and order construction.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::models::{CustomerInfo, Order, ShippingInfo, User};
use crate::types::{Email, MpesaPhone, OrderStatus, PaymentStatus, PhoneError, UserId};

/// Payment method recorded on every order placed from the storefront.
pub const PAYMENT_METHOD_MPESA: &str = "mpesa";

/// Reasons checkout cannot proceed. The messages are shown to the customer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,
    #[error("First name is required")]
    FirstNameRequired,
    #[error("Last name is required")]
    LastNameRequired,
    #[error("Valid email is required")]
    InvalidEmail,
    #[error("{0}")]
    Phone(#[from] PhoneError),
    #[error("Address is required")]
    AddressRequired,
    #[error("City is required")]
    CityRequired,
}

/// The checkout form. Field names match the draft saved between visits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub notes: String,
}

fn first_filled(preferred: Option<&str>, fallback: Option<&str>) -> String {
    [preferred, fallback]
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_owned()
}

impl CheckoutForm {
    /// Initial form values: the signed-in user's contact details win over
    /// the saved draft; delivery fields come from the draft only.
    #[must_use]
    pub fn prefill(user: Option<&User>, draft: Option<&Self>) -> Self {
        Self {
            first_name: first_filled(
                user.map(|u| u.first_name.as_str()),
                draft.map(|d| d.first_name.as_str()),
            ),
            last_name: first_filled(
                user.map(|u| u.last_name.as_str()),
                draft.map(|d| d.last_name.as_str()),
            ),
            email: first_filled(
                user.map(|u| u.email.as_str()),
                draft.map(|d| d.email.as_str()),
            ),
            phone: first_filled(
                user.map(|u| u.phone_number.as_str()),
                draft.map(|d| d.phone.as_str()),
            ),
            address: first_filled(None, draft.map(|d| d.address.as_str())),
            city: first_filled(None, draft.map(|d| d.city.as_str())),
            postal_code: first_filled(None, draft.map(|d| d.postal_code.as_str())),
            notes: first_filled(None, draft.map(|d| d.notes.as_str())),
        }
    }

    /// Check the form in display order and return the normalized M-Pesa
    /// number.
    ///
    /// # Errors
    ///
    /// Returns the first failing field's [`CheckoutError`].
    pub fn validate(&self) -> Result<MpesaPhone, CheckoutError> {
        if self.first_name.trim().is_empty() {
            return Err(CheckoutError::FirstNameRequired);
        }
        if self.last_name.trim().is_empty() {
            return Err(CheckoutError::LastNameRequired);
        }
        Email::parse(&self.email).map_err(|_| CheckoutError::InvalidEmail)?;
        let phone = MpesaPhone::parse(&self.phone)?;
        if self.address.trim().is_empty() {
            return Err(CheckoutError::AddressRequired);
        }
        if self.city.trim().is_empty() {
            return Err(CheckoutError::CityRequired);
        }
        Ok(phone)
    }
}

/// Build the order to submit for `cart`.
///
/// The order has no ID yet; status and payment status are pending and the
/// payment method is M-Pesa.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] for an empty cart, otherwise the
/// first form validation failure.
pub fn build_order(
    form: &CheckoutForm,
    cart: &Cart,
    user_id: Option<UserId>,
) -> Result<Order, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let phone = form.validate()?;
    let totals = cart.totals();
    let notes = form.notes.trim();

    Ok(Order {
        id: None,
        customer: CustomerInfo {
            user_id,
            first_name: form.first_name.trim().to_owned(),
            last_name: form.last_name.trim().to_owned(),
            email: form.email.trim().to_owned(),
            phone_number: phone.into_inner(),
        },
        shipping: ShippingInfo {
            address: form.address.trim().to_owned(),
            city: form.city.trim().to_owned(),
            postal_code: form.postal_code.trim().to_owned(),
        },
        items: cart
            .items()
            .iter()
            .filter_map(crate::cart::CartItem::to_order_item)
            .collect(),
        subtotal: totals.subtotal,
        delivery_fee: totals.delivery_fee,
        total: totals.total,
        status: OrderStatus::Pending,
        payment_method: Some(PAYMENT_METHOD_MPESA.to_owned()),
        payment_status: PaymentStatus::Pending,
        notes: (!notes.is_empty()).then(|| notes.to_owned()),
        created_at: None,
        updated_at: None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::Product;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Achieng".to_owned(),
            last_name: "Otieno".to_owned(),
            email: "achieng@example.com".to_owned(),
            phone: "0712 345 678".to_owned(),
            address: "Kimathi Street 4".to_owned(),
            city: "Nairobi".to_owned(),
            postal_code: "00100".to_owned(),
            notes: "  ".to_owned(),
        }
    }

    fn cart_with(price: i64, quantity: u32) -> Cart {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "p1", "name": "Maxi Dress", "slug": "maxi-dress", "price": price,
            "images": ["/img/a.jpg", "/img/b.jpg"], "stock": 10
        }))
        .unwrap();
        let mut cart = Cart::new();
        cart.add_item(product, quantity, Some("M".to_owned()), None).unwrap();
        cart
    }

    #[test]
    fn test_validation_order_and_messages() {
        let cases: [(fn(&mut CheckoutForm), &str); 7] = [
            (|f| f.first_name.clear(), "First name is required"),
            (|f| f.last_name = " ".to_owned(), "Last name is required"),
            (|f| f.email = "nope".to_owned(), "Valid email is required"),
            (|f| f.phone.clear(), "Phone number is required"),
            (|f| f.phone = "0812345678".to_owned(), "Please enter a valid Kenyan phone number"),
            (|f| f.address.clear(), "Address is required"),
            (|f| f.city.clear(), "City is required"),
        ];
        for (break_form, message) in cases {
            let mut form = valid_form();
            break_form(&mut form);
            assert_eq!(form.validate().unwrap_err().to_string(), message);
        }
    }

    #[test]
    fn test_first_failure_wins() {
        let form = CheckoutForm {
            email: String::new(),
            city: String::new(),
            ..valid_form()
        };
        assert_eq!(form.validate().unwrap_err(), CheckoutError::InvalidEmail);
    }

    #[test]
    fn test_build_order() {
        let order = build_order(&valid_form(), &cart_with(3000, 2), Some(UserId::new("u1"))).unwrap();

        assert_eq!(order.id, None);
        assert_eq!(order.customer.phone_number, "254712345678");
        assert_eq!(order.customer.user_id, Some(UserId::new("u1")));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].image.as_deref(), Some("/img/a.jpg"));
        assert_eq!(order.items[0].size.as_deref(), Some("M"));
        assert_eq!(order.subtotal, Decimal::from(6000));
        assert_eq!(order.delivery_fee, Decimal::from(500));
        assert_eq!(order.total, Decimal::from(6500));
        assert_eq!(order.payment_method.as_deref(), Some("mpesa"));
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.notes, None);
    }

    #[test]
    fn test_build_order_free_delivery() {
        let order = build_order(&valid_form(), &cart_with(5000, 2), None).unwrap();
        assert_eq!(order.delivery_fee, Decimal::ZERO);
        assert_eq!(order.total, Decimal::from(10_000));
    }

    #[test]
    fn test_empty_cart_checked_first() {
        let form = CheckoutForm::default();
        assert_eq!(
            build_order(&form, &Cart::new(), None).unwrap_err(),
            CheckoutError::EmptyCart
        );
    }

    #[test]
    fn test_prefill_prefers_user_then_draft() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "u1", "email": "user@example.com", "first_name": "Baraka",
            "last_name": "", "phone_number": "0711000000"
        }))
        .unwrap();
        let draft = CheckoutForm {
            last_name: "Draft".to_owned(),
            email: "draft@example.com".to_owned(),
            ..valid_form()
        };

        let form = CheckoutForm::prefill(Some(&user), Some(&draft));
        assert_eq!(form.first_name, "Baraka");
        assert_eq!(form.last_name, "Draft");
        assert_eq!(form.email, "user@example.com");
        assert_eq!(form.phone, "0711000000");
        assert_eq!(form.city, "Nairobi");

        assert_eq!(CheckoutForm::prefill(None, None), CheckoutForm::default());
    }

    #[test]
    fn test_draft_uses_camel_case_keys() {
        let value = serde_json::to_value(valid_form()).unwrap();
        assert_eq!(value["firstName"], "Achieng");
        assert_eq!(value["postalCode"], "00100");
    }
}

//! Checkout command.

use clap::Args;
use elegance_core::checkout::CheckoutForm;
use elegance_storefront::workflows::CheckoutService;

use super::{CommandError, Context};
use crate::output;

/// Delivery and contact details. Anything left out is taken from your
/// account or the last checkout attempt.
#[derive(Args, Debug, Default)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// M-Pesa phone number, e.g. 0712345678
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub postal_code: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl CheckoutArgs {
    /// Overlay the given fields on `form`.
    fn apply(self, mut form: CheckoutForm) -> CheckoutForm {
        let fields = [
            (self.first_name, &mut form.first_name),
            (self.last_name, &mut form.last_name),
            (self.email, &mut form.email),
            (self.phone, &mut form.phone),
            (self.address, &mut form.address),
            (self.city, &mut form.city),
            (self.postal_code, &mut form.postal_code),
            (self.notes, &mut form.notes),
        ];
        for (value, field) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
        form
    }
}

pub async fn run(ctx: &Context, args: CheckoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let checkout = CheckoutService::new(ctx.client.clone(), ctx.store.clone());
    let form = args.apply(checkout.initial_form().await?);

    let order = match checkout.place_order(&form).await {
        Ok(order) => order,
        Err(e) => return Err(CommandError::Rejected(e.user_message()).into()),
    };
    output::print(&format!("Order placed: {}", output::order_line(&order)));

    match ctx.client.website_config().await {
        Ok(config) if config.mpesa.is_configured() => {
            output::print(&output::mpesa_instructions(&config.mpesa, order.total));
        }
        Ok(_) => output::print("We will contact you with payment details."),
        Err(e) => tracing::warn!(error = %e, "Could not load payment details"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_only_given_fields() {
        let base = CheckoutForm {
            first_name: "Amina".to_owned(),
            city: "Mombasa".to_owned(),
            ..CheckoutForm::default()
        };
        let args = CheckoutArgs {
            city: Some("Nairobi".to_owned()),
            address: Some("Moi Avenue 12".to_owned()),
            ..CheckoutArgs::default()
        };

        let form = args.apply(base);
        assert_eq!(form.first_name, "Amina");
        assert_eq!(form.city, "Nairobi");
        assert_eq!(form.address, "Moi Avenue 12");
    }
}

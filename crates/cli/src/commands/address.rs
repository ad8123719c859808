//! Delivery address commands.

use clap::Subcommand;

use tamarind_core::AddressId;
use tamarind_storefront::StorefrontSession;
use tamarind_storefront::api::types::AddressInput;

use super::CliError;

#[derive(Subcommand)]
pub enum AddressAction {
    /// List saved addresses
    List,
    /// Add an address
    Add {
        /// Recipient name
        #[arg(long)]
        name: String,

        /// Contact phone
        #[arg(long)]
        phone: String,

        /// Address line 1
        #[arg(long)]
        line1: String,

        /// Address line 2
        #[arg(long)]
        line2: Option<String>,

        /// City
        #[arg(long)]
        city: String,

        /// State
        #[arg(long)]
        state: String,

        /// Postal code
        #[arg(long)]
        pincode: String,
    },
    /// Remove an address
    Remove {
        /// Address id
        id: i32,
    },
    /// Mark an address as the default
    SetDefault {
        /// Address id
        id: i32,
    },
}

pub async fn run(session: &StorefrontSession, action: AddressAction) -> Result<(), CliError> {
    let addresses = session.addresses();

    match action {
        AddressAction::List => {
            addresses.refresh().await?;
            for address in addresses.snapshot().await {
                let default = if address.is_default { " (default)" } else { "" };
                println!(
                    "{:>4}  {}, {}, {} {}{default}",
                    address.id, address.full_name, address.address_line1, address.city,
                    address.pincode
                );
            }
        }
        AddressAction::Add {
            name,
            phone,
            line1,
            line2,
            city,
            state,
            pincode,
        } => {
            let input = AddressInput {
                full_name: name,
                phone,
                address_line1: line1,
                address_line2: line2,
                city,
                state,
                pincode,
            };
            let address = addresses.create(&input).await?;
            println!("Saved address #{}.", address.id);
        }
        AddressAction::Remove { id } => {
            addresses.delete(AddressId::new(id)).await?;
            println!("Address removed.");
        }
        AddressAction::SetDefault { id } => {
            addresses.set_default(AddressId::new(id)).await?;
            println!("Default address updated.");
        }
    }

    Ok(())
}

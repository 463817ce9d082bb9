use tracing::{info, warn};

use crate::db::models::{Customer, CustomerId, NewCustomer, Reservation, TopCustomer};
use crate::db::operations::{CustomerStore, ReservationStore};
use crate::error::AppError;
use crate::Result;

/// Size of the top customers report.
pub const TOP_CUSTOMERS_LIMIT: i64 = 10;

impl Customer {
    /// All customers, ordered by last name then first name. Never fails on zero rows.
    pub async fn all<S: CustomerStore + ?Sized>(store: &S) -> Result<Vec<Customer>> {
        store.list_customers().await
    }

    /// Case-insensitive substring search on the last name.
    ///
    /// Unlike [`Customer::all`], an empty result is reported as `NotFound`.
    pub async fn search_by_last_name<S: CustomerStore + ?Sized>(
        store: &S,
        fragment: &str,
    ) -> Result<Vec<Customer>> {
        let customers = store.search_customers(fragment).await?;

        if customers.is_empty() {
            return Err(AppError::NotFound(
                "Could not find customer based on that search".to_string(),
            ));
        }

        Ok(customers)
    }

    pub async fn get<S: CustomerStore + ?Sized>(store: &S, id: CustomerId) -> Result<Customer> {
        store
            .get_customer(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No such customer: {}", id)))
    }

    /// The ten customers with the most reservations. Customers without
    /// reservations take part in the ranking with a count of zero.
    pub async fn top_ten<S: CustomerStore + ?Sized>(store: &S) -> Result<Vec<TopCustomer>> {
        let customers = store.top_customers(TOP_CUSTOMERS_LIMIT).await?;

        if customers.is_empty() {
            warn!("Top customers report came back empty");
            return Err(AppError::NotFound(
                "Looks like something went wrong with the request or no customers have reservations"
                    .to_string(),
            ));
        }

        Ok(customers)
    }

    pub async fn reservations<S: ReservationStore + ?Sized>(&self, store: &S) -> Result<Vec<Reservation>> {
        Reservation::for_customer(store, self.id()).await
    }

    /// Write every mutable field back to the stored row.
    pub async fn save<S: CustomerStore + ?Sized>(&self, store: &S) -> Result<()> {
        let updated = store.update_customer(self).await?;

        if updated == 0 {
            return Err(AppError::NotFound(format!("No such customer: {}", self.id())));
        }

        Ok(())
    }
}

impl NewCustomer {
    /// Insert the customer, returning it with its assigned id.
    pub async fn save<S: CustomerStore + ?Sized>(self, store: &S) -> Result<Customer> {
        let id = store.insert_customer(&self).await?;
        info!("Created customer {} ({})", id, self.full_name());
        Ok(Customer::from_new(id, self))
    }
}

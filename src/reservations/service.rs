use chrono::Datelike;
use tracing::info;

use crate::db::models::{CustomerId, NewReservation, Reservation};
use crate::db::operations::ReservationStore;
use crate::error::AppError;
use crate::Result;

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

impl Reservation {
    /// Reservations belonging to `customer_id`, in the order they were stored.
    pub async fn for_customer<S: ReservationStore + ?Sized>(
        store: &S,
        customer_id: CustomerId,
    ) -> Result<Vec<Reservation>> {
        store.reservations_for_customer(customer_id).await
    }

    /// `start_at` rendered like `January 5th 2024, 6:30 pm`.
    pub fn formatted_start_at(&self) -> String {
        let day = self.start_at.day();
        format!(
            "{} {}{} {}",
            self.start_at.format("%B"),
            day,
            ordinal_suffix(day),
            self.start_at.format("%Y, %-I:%M %P"),
        )
    }

    pub async fn save<S: ReservationStore + ?Sized>(&self, store: &S) -> Result<()> {
        let updated = store.update_reservation(self).await?;

        if updated == 0 {
            return Err(AppError::NotFound(format!("No such reservation: {}", self.id())));
        }

        Ok(())
    }
}

impl NewReservation {
    pub async fn save<S: ReservationStore + ?Sized>(self, store: &S) -> Result<Reservation> {
        let id = store.insert_reservation(&self).await?;
        info!("Created reservation {} for customer {}", id, self.customer_id);
        Ok(Reservation::from_new(id, self))
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type CustomerId = i32;
pub type ReservationId = i32;

fn join_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name)
}

/// A customer that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl NewCustomer {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: None,
            notes: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn full_name(&self) -> String {
        join_name(&self.first_name, &self.last_name)
    }
}

/// A stored customer. The id is assigned by the database and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl Customer {
    pub(crate) fn from_new(id: CustomerId, customer: NewCustomer) -> Self {
        Self {
            id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            phone: customer.phone,
            notes: customer.notes,
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn full_name(&self) -> String {
        join_name(&self.first_name, &self.last_name)
    }

    /// Overwrite every mutable field, keeping the identity.
    pub fn apply(&mut self, changes: NewCustomer) {
        self.first_name = changes.first_name;
        self.last_name = changes.last_name;
        self.phone = changes.phone;
        self.notes = changes.notes;
    }
}

/// Row of the top customers report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomer {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub customer: Customer,
    pub num_reservations: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    pub customer_id: CustomerId,
    pub num_guests: i32,
    pub start_at: NaiveDateTime,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    id: ReservationId,
    pub customer_id: CustomerId,
    pub num_guests: i32,
    pub start_at: NaiveDateTime,
    pub notes: Option<String>,
}

impl Reservation {
    pub(crate) fn from_new(id: ReservationId, reservation: NewReservation) -> Self {
        Self {
            id,
            customer_id: reservation.customer_id,
            num_guests: reservation.num_guests,
            start_at: reservation.start_at,
            notes: reservation.notes,
        }
    }

    pub fn id(&self) -> ReservationId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let customer = NewCustomer::new("Ana", "Lee");
        assert_eq!(customer.full_name(), "Ana Lee");

        let customer = Customer::from_new(4, customer);
        assert_eq!(customer.full_name(), "Ana Lee");
    }

    #[test]
    fn test_apply_keeps_id() {
        let mut customer = Customer::from_new(12, NewCustomer::new("Bob", "Zephyr").with_phone("555-0101"));
        customer.apply(NewCustomer::new("Robert", "Zephyr").with_notes("window seat"));

        assert_eq!(customer.id(), 12);
        assert_eq!(customer.first_name, "Robert");
        assert_eq!(customer.phone, None);
        assert_eq!(customer.notes.as_deref(), Some("window seat"));
    }

    #[test]
    fn test_customer_json_shape() {
        let top = TopCustomer {
            customer: Customer::from_new(3, NewCustomer::new("Amy", "Adams")),
            num_reservations: 5,
        };
        let json = serde_json::to_value(&top).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["firstName"], "Amy");
        assert_eq!(json["lastName"], "Adams");
        assert_eq!(json["numReservations"], 5);
        assert!(json["phone"].is_null());
    }

    #[test]
    fn test_new_customer_from_json() {
        let customer: NewCustomer = serde_json::from_str(
            r#"{"firstName": "Ana", "lastName": "Lee", "phone": "555-0199"}"#,
        )
        .unwrap();

        assert_eq!(customer.first_name, "Ana");
        assert_eq!(customer.phone.as_deref(), Some("555-0199"));
        assert_eq!(customer.notes, None);
    }
}

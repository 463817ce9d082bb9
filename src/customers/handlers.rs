use actix_web::{web, HttpResponse};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::db::models::{Customer, CustomerId, NewCustomer, NewReservation, Reservation};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CustomerDetail {
    pub customer: Customer,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub reservations: Vec<ReservationView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationView {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub formatted_start_at: String,
}

impl From<Reservation> for ReservationView {
    fn from(reservation: Reservation) -> Self {
        let formatted_start_at = reservation.formatted_start_at();
        Self { reservation, formatted_start_at }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationForm {
    pub num_guests: i32,
    pub start_at: NaiveDateTime,
    pub notes: Option<String>,
}

pub async fn list_customers(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let customers = Customer::all(state.db.as_ref()).await?;
    Ok(HttpResponse::Ok().json(customers))
}

pub async fn search_customers(
    query: web::Query<SearchQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Searching customers by last name: {}", query.name);
    let customers = Customer::search_by_last_name(state.db.as_ref(), &query.name).await?;
    Ok(HttpResponse::Ok().json(customers))
}

pub async fn top_customers(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let customers = Customer::top_ten(state.db.as_ref()).await?;
    Ok(HttpResponse::Ok().json(customers))
}

pub async fn get_customer(
    path: web::Path<CustomerId>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let customer = Customer::get(state.db.as_ref(), path.into_inner()).await?;
    let reservations = customer.reservations(state.db.as_ref()).await?;

    Ok(HttpResponse::Ok().json(CustomerDetail {
        full_name: customer.full_name(),
        customer,
        reservations: reservations.into_iter().map(ReservationView::from).collect(),
    }))
}

pub async fn create_customer(
    req: web::Json<NewCustomer>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    match req.into_inner().save(state.db.as_ref()).await {
        Ok(customer) => Ok(HttpResponse::Created().json(customer)),
        Err(e) => {
            error!("Failed to create customer: {}", e);
            Err(e)
        }
    }
}

pub async fn edit_customer(
    path: web::Path<CustomerId>,
    req: web::Json<NewCustomer>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let mut customer = Customer::get(state.db.as_ref(), path.into_inner()).await?;
    customer.apply(req.into_inner());
    customer.save(state.db.as_ref()).await?;

    info!("Updated customer {}", customer.id());
    Ok(HttpResponse::Ok().json(customer))
}

pub async fn add_reservation(
    path: web::Path<CustomerId>,
    req: web::Json<ReservationForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let customer = Customer::get(state.db.as_ref(), path.into_inner()).await?;
    let form = req.into_inner();

    let reservation = NewReservation {
        customer_id: customer.id(),
        num_guests: form.num_guests,
        start_at: form.start_at,
        notes: form.notes,
    }
    .save(state.db.as_ref())
    .await?;

    Ok(HttpResponse::Created().json(ReservationView::from(reservation)))
}

/// Register the customer routes. Fixed segments come before `/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/customers")
            .route("", web::get().to(list_customers))
            .route("", web::post().to(create_customer))
            .route("/search", web::get().to(search_customers))
            .route("/top", web::get().to(top_customers))
            .route("/{id}", web::get().to(get_customer))
            .route("/{id}/edit", web::post().to(edit_customer))
            .route("/{id}/add-reservation", web::post().to(add_reservation)),
    );
}

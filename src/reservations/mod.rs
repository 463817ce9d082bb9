//! Reservation accessor: loading a customer's reservations and saving them.

mod service;

//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod payment_request;

pub use payment_request::{
    Column as PaymentRequestColumn, Entity as PaymentRequest, Model as PaymentRequestModel,
};

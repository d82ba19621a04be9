//! Formgate Services Layer
//!
//! Form identity validation. Before any upload or download the gateway asks the
//! tenant's identity service whether the numeric form id belongs to a known form;
//! the [`FormValidator`] trait is that question and [`DatastoreValidator`] answers it
//! with a Google Cloud Datastore lookup of kind `Survey`.

pub mod validator;

pub use validator::{
    DatastoreValidator, DatastoreValidatorFactory, FormValidator, ServiceAccountKey,
    ValidatorError, ValidatorFactory, DATASTORE_SCOPE, SURVEY_KIND,
};

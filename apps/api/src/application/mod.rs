// Application package generation: form types, submission validation,
// result formatting and the HTTP handlers that tie composer and gateway together.
// All backend calls go through gateway::Gateway.

pub mod formatting;
pub mod handlers;
pub mod models;
pub mod validation;

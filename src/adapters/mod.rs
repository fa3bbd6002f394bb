pub mod api_handler;
pub mod form_store;
pub mod generation_client;
pub mod health_handler;
pub mod normalizer;
pub mod submission;

#[cfg(test)]
mod form_store_test;

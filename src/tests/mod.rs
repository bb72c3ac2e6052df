mod models_tests;
mod registry_tests;

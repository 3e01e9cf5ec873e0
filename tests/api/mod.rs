mod auth_tests;
mod health_tests;
mod session_tests;

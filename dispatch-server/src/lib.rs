pub mod console;
pub mod routes;

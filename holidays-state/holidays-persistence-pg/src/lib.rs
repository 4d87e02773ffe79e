pub mod db;
mod mapping;
mod statements;
mod trait_impl;

pub use db::PostgresHolidaySink;

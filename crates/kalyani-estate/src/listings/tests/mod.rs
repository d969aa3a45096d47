mod common;
mod repository;

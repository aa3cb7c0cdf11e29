//! Data transfer objects for the REST API.

pub mod auth_dto;

pub use auth_dto::{
    AuthorizeResponse, LoginRequest, LogoutResponse, RegisterRequest, RegisterResponse,
};

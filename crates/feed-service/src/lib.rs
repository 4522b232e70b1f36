//! # feed-service
//!
//! Application layer: services, DTOs and the dependency container that
//! wires repositories, session storage and event publishing together.

pub mod dto;
pub mod services;

pub use services::{
    AuthService, CommentService, PostService, ReactionService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, UserService,
};

//! Core business logic for Cinebook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types and validation rules live here.
//!
//! # Modules
//!
//! - `auth` - Password hashing, token shape, auth session entities
//! - `movie` - Movies, scheduled sessions, and exhibition timeslots
//! - `ticket` - Ticket lifecycle (purchase, one-way use transition)
//! - `user` - User accounts and roles

pub mod auth;
pub mod movie;
pub mod ticket;
pub mod user;

//! # citymap-core
//!
//! Core types and traits for the city map bot: [`Bot`], [`Handler`], [`CityLookup`], message and user
//! types, the shared [`MarkerColor`] contract, render options, and tracing initialization.
//! Transport-agnostic apart from the teloxide-backed [`TelegramBot`].

pub mod bot;
pub mod error;
pub mod logger;
pub mod lookup;
pub mod render;
pub mod types;

pub use bot::{Bot, TelegramBot};
pub use error::{DbotError, Result};
pub use logger::init_tracing;
pub use lookup::{CityLookup, Coordinates};
pub use render::{MarkerColor, RenderOptions, RenderRequest, UnknownColor};
pub use types::{Chat, Handler, HandlerResponse, Message, ToCoreMessage, ToCoreUser, User};

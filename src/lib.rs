//! EnviLog operator console controller.
//!
//! Client-side orchestration for an EnviLog device's WiFi connectivity:
//! status polling, network-mode tracking, credential and mode-switch
//! submission over a transport those requests may themselves sever, and
//! the reconnection guidance state machine that disambiguates "request
//! failed" from "request succeeded and the device changed networks".
//!
//! Rendering is out of scope: a host embeds [`controller::ConsoleController`],
//! dispatches [`events::UserAction`]s into it, feeds background
//! [`events::ConsoleEvent`]s through it, and renders from
//! [`view_state::ConsoleViewState`].

pub mod adapters;
pub mod config;
pub mod controller;
pub mod device;
pub mod events;
pub mod guidance;
pub mod models;
pub mod poller;
pub mod status;
pub mod traits;
pub mod transition;
pub mod view_state;

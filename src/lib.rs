//! Canvas rendering and input engine for the Isolani level editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It keeps the
//! raw JSON text of the board and zone tabs, draws the board from that text,
//! maps pointer input through a pan/zoom camera, resolves clicks to entities,
//! and finds the source text of a selected entity so the host can highlight
//! it. The host JavaScript layer owns the text editor widget and the DOM; it
//! forwards events to the engine and applies the resulting
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`wasm`] | `wasm-bindgen` handle exported to the host |
//! | [`doc`] | Tab text store, parsing, and entity append |
//! | [`model`] | Level data types (board, zones, entities, properties) |
//! | `lenient` | Forgiving field decoders used by [`model`] |
//! | [`camera`] | Pan/zoom camera and screen/world/cell conversions |
//! | [`scene`] | One draw pass: footprints, glyphs, hit-boxes |
//! | [`render`] | Paints a scene to the canvas |
//! | [`hit`] | Click resolution against hit-boxes |
//! | [`locate`] | Finds an entity's byte span in a tab's text |
//! | [`summary`] | Info-panel rows for a selected entity |
//! | [`template`] | Add-entity targets and templates |
//! | [`input`] | Input event types and the pan gesture state |
//! | [`config`] | Runtime editor settings |
//! | [`error`] | Error types |
//! | [`consts`] | Shared constants (cell size, zoom limits, colors) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod hit;
pub mod input;
mod lenient;
pub mod locate;
pub mod model;
pub mod render;
pub mod scene;
pub mod summary;
pub mod template;
pub mod wasm;

//! Pointer-driven manipulation engine for the anchor editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser. A base
//! texture defines the world frame; image, video, and model anchors sit on
//! top of it. The engine turns raw pointer, wheel, and key input into
//! selection, camera panning and zooming, anchor dragging, and corner-handle
//! scaling. The host JavaScript layer decodes assets, renders the scene the
//! engine describes, and reacts to the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Anchors, their geometry, and the insertion-ordered scene store |
//! | [`camera`] | Orthographic camera, viewport, and screen → world mapping |
//! | [`framing`] | Fits the camera around newly loaded base content |
//! | [`hit`] | Two-tier hit-testing of handles and anchors |
//! | [`selection`] | Current selection and its outline/handle overlay |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`readout`] | Texture-relative position/size of an anchor |
//! | [`config`] | Host-tunable parameters |
//! | [`error`] | Errors returned to the host |
//! | [`consts`] | Shared numeric constants (depth planes, zoom limits, etc.) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod framing;
pub mod hit;
pub mod input;
pub mod readout;
pub mod selection;

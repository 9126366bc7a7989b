//! Interactive model visibility tools.
//!
//! The sensors and kids projections models can be shown and hidden from
//! three input paths that all end in the same event:
//!
//! ```text
//! Button press / `n`,`m` key / `toggle_model` RPC
//!   └─> ToggleModelVisibility
//!       └─> apply_visibility_toggles()
//!           ├─> Flip Hidden <-> Inherited on the model root
//!           ├─> Request a redraw
//!           └─> Send `visibility_changed` notification to the host page
//! ```
//!
//! Requests for a model that has not been attached yet are ignored. The
//! main model is always shown.

/// On-screen toggle buttons, stacked top-left.
pub mod toggle_buttons;

/// Toggle event, keyboard shortcuts and the system that applies toggles.
pub mod visibility_toggle;

//! Flutter-facing bindings over `starspace_core`.

pub mod api;

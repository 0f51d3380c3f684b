//! Dashboard rendering -- pure transforms from the manifest to view models,
//! plus the template assembly and the manifest fetch seam.
//!
//! Everything in [`view`] and [`chart`] is a deterministic, side-effect-free
//! function over borrowed manifest data; [`html`] turns the view models into
//! the static page and [`source`] supplies the manifest from disk or HTTP.

pub mod chart;
pub mod html;
pub mod source;
pub mod view;

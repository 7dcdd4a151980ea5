//! Background-image layout resolution and natural-space crop mapping.
//!
//! Given a banner rendered as a CSS background image and a circular
//! avatar overlapping it, computes where the avatar sits on the
//! *original, full-resolution* image and recommends a clamped square
//! crop. Pure geometry — no pixel operations, no DOM, no network,
//! `no_std` compatible.
//!
//! # Modules
//!
//! - [`geometry`] — size/position resolution and natural-space mapping
//! - [`css`] — tokenizer for the supported `background-*` value subset
//! - [`measure`] — end-to-end measurement pipeline and report record

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod css;
pub mod geometry;
#[cfg(feature = "measure")]
pub mod measure;

// Re-exports: core types from the geometry module
pub use geometry::{
    CropBox, NaturalTarget, Offset, PixelCrop, Point, PositionSpec, PositionValue, Rect, Size,
    SizeSpec, SizeValue, map_and_crop, map_to_natural,
};
#[cfg(feature = "measure")]
pub use measure::{
    ElementLocator, ElementStyle, MeasureError, Measurement, NaturalSize, NaturalSizeProvider,
    NaturalSizeSource, StyledElement, measure,
};

//! End-to-end banner measurement: locate, resolve, map, report.
//!
//! Orchestrates the geometry engine over host-supplied element and image
//! capabilities. The host implements [`ElementLocator`] (walking whatever
//! layout tree it has) and [`NaturalSizeProvider`] (decoding the banner
//! image); everything else is pure arithmetic. The result is returned as
//! a [`Measurement`] record — no caching, no global state, no side
//! effects.
//!
//! # Example
//!
//! ```
//! use bannerlayout::geometry::{Rect, Size};
//! use bannerlayout::measure::{
//!     ElementLocator, ElementStyle, NaturalSizeProvider, StyledElement, measure,
//! };
//!
//! struct Page;
//!
//! impl ElementLocator for Page {
//!     fn locate_container(&self) -> Option<StyledElement> {
//!         Some(StyledElement {
//!             rect: Rect::new(0.0, 0.0, 1240.0, 260.0),
//!             style: ElementStyle {
//!                 background_image: r#"url("banner-t2480x520.jpg")"#.into(),
//!                 background_size: "cover".into(),
//!                 background_position: "50% 50%".into(),
//!             },
//!         })
//!     }
//!     fn locate_avatar(&self) -> Option<Rect> {
//!         Some(Rect::new(40.0, 60.0, 160.0, 160.0))
//!     }
//! }
//!
//! struct NoDecoder;
//!
//! impl NaturalSizeProvider for NoDecoder {
//!     fn decode(&self, _url: &str) -> Option<Size> {
//!         None // decode failed; dimensions fall back to the URL pattern
//!     }
//! }
//!
//! let report = measure(&Page, &NoDecoder).unwrap();
//! assert_eq!(report.natural.size, Size::new(2480.0, 520.0));
//! assert_eq!(report.crop.size, 320.0);
//! ```

use alloc::string::{String, ToString};

use crate::css;
use crate::geometry::{CropBox, Offset, Point, Rect, Size, map_to_natural};

/// Computed background styles of the banner container.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ElementStyle {
    /// Computed `background-image` value (may be `none`).
    pub background_image: String,
    /// Computed `background-size` value.
    pub background_size: String,
    /// Computed `background-position` value.
    pub background_position: String,
}

/// An element's bounding rect plus the styles the engine reads.
#[derive(Clone, Debug, PartialEq)]
pub struct StyledElement {
    /// Bounding rect in page coordinates.
    pub rect: Rect,
    /// Computed background styles.
    pub style: ElementStyle,
}

/// Locates the banner container and the avatar on a page.
///
/// Implementations own all environment introspection (DOM walking,
/// accessibility trees, screenshots — whatever the host has). The engine
/// only consumes the resulting rects and style strings.
pub trait ElementLocator {
    /// The element whose background is the banner image.
    fn locate_container(&self) -> Option<StyledElement>;
    /// The avatar's bounding rect, in the same coordinate space as the
    /// container rect.
    fn locate_avatar(&self) -> Option<Rect>;
}

/// Supplies the banner image's intrinsic dimensions by decoding it.
///
/// A single-shot operation per measurement: the host may fetch and decode
/// however it likes (and impose its own timeout). Returning `None` is not
/// fatal — the pipeline falls back to dimensions embedded in the URL.
pub trait NaturalSizeProvider {
    /// Intrinsic pixel dimensions of the image at `url`, if decodable.
    fn decode(&self, url: &str) -> Option<Size>;
}

/// How the natural banner dimensions were obtained.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NaturalSizeSource {
    /// Decoded from the image itself.
    Loaded,
    /// Parsed from a `-t{W}x{H}.` pattern in the image URL.
    GuessedFromUrl,
}

/// Natural banner dimensions plus their provenance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NaturalSize {
    /// Intrinsic pixel dimensions.
    pub size: Size,
    /// Where the dimensions came from.
    pub source: NaturalSizeSource,
}

/// Measurement failure. Terminal — no partial record is produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeasureError {
    /// The locator could not find the container and/or the avatar.
    /// Each flag records whether that element was found.
    ElementsNotFound { container: bool, avatar: bool },
    /// The image could not be decoded and its URL carries no dimension
    /// pattern. Size resolution requires positive natural dimensions, so
    /// the pipeline fails closed rather than guess.
    NoNaturalSize,
}

/// The full measurement record.
///
/// Every intermediate the pipeline computes, plus the final recommended
/// crop. Hosts serialize this however they need.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    /// Banner image URL, when the background had one.
    pub banner_url: Option<String>,
    /// Natural banner dimensions and their provenance.
    pub natural: NaturalSize,
    /// Container dimensions in page pixels.
    pub element_size: Size,
    /// Resolved rendered dimensions of the background image.
    pub rendered_size: Size,
    /// Resolved offset of the rendered image within the container.
    pub rendered_offset: Offset,
    /// Avatar bounding rect in page pixels.
    pub avatar_rect: Rect,
    /// Avatar center in natural banner pixels.
    pub avatar_center_natural: Point,
    /// Avatar diameter in natural banner pixels.
    pub avatar_diameter_natural: f64,
    /// Recommended square crop, clamped inside the natural image.
    pub crop: CropBox,
}

/// Run the full measurement pipeline.
///
/// Locates the elements, obtains the natural banner size (decode first,
/// URL pattern second), then resolves and maps. Fails with
/// [`MeasureError::ElementsNotFound`] or [`MeasureError::NoNaturalSize`];
/// malformed style values never fail (see [`crate::css`]).
pub fn measure<L, P>(locator: &L, provider: &P) -> Result<Measurement, MeasureError>
where
    L: ElementLocator,
    P: NaturalSizeProvider,
{
    let container = locator.locate_container();
    let avatar = locator.locate_avatar();
    let (container, avatar_rect) = match (container, avatar) {
        (Some(c), Some(a)) => (c, a),
        (c, a) => {
            return Err(MeasureError::ElementsNotFound {
                container: c.is_some(),
                avatar: a.is_some(),
            });
        }
    };

    let natural = natural_size(&container.style.background_image, provider)
        .ok_or(MeasureError::NoNaturalSize)?;

    Ok(resolve_banner(&container, avatar_rect, natural))
}

/// The pure second phase: resolve and map with everything in hand.
///
/// Useful when the host already has the rects, styles, and natural size
/// and only wants the arithmetic. Deterministic and total.
pub fn resolve_banner(
    container: &StyledElement,
    avatar_rect: Rect,
    natural: NaturalSize,
) -> Measurement {
    let size_spec = css::parse_size(&container.style.background_size);
    let position_spec = css::parse_position(&container.style.background_position);

    let element_size = container.rect.size();
    let rendered = size_spec.resolve(natural.size, element_size);
    let offset = position_spec.resolve(element_size, rendered);

    let target = map_to_natural(
        avatar_rect,
        container.rect.origin(),
        rendered,
        offset,
        natural.size,
    );

    Measurement {
        banner_url: css::background_image_url(&container.style.background_image)
            .map(ToString::to_string),
        natural,
        element_size,
        rendered_size: rendered,
        rendered_offset: offset,
        avatar_rect,
        avatar_center_natural: target.center,
        avatar_diameter_natural: target.diameter,
        crop: target.crop_box(natural.size),
    }
}

/// Obtain the natural banner size: decode, then URL-pattern fallback.
///
/// With no extractable URL, the pattern scan runs over the raw
/// `background-image` value instead (the URL is in there somewhere even
/// when the quoting defeats extraction).
fn natural_size<P: NaturalSizeProvider>(background_image: &str, provider: &P) -> Option<NaturalSize> {
    match css::background_image_url(background_image) {
        Some(url) => {
            if let Some(size) = provider.decode(url).filter(positive) {
                return Some(NaturalSize {
                    size,
                    source: NaturalSizeSource::Loaded,
                });
            }
            dimensions_from_url(url).filter(positive).map(guessed)
        }
        None => dimensions_from_url(background_image).filter(positive).map(guessed),
    }
}

/// The engine divides by natural dimensions; zero-sized results from a
/// decoder or a degenerate URL pattern count as no natural size at all.
fn positive(size: &Size) -> bool {
    size.width > 0.0 && size.height > 0.0
}

fn guessed(size: Size) -> NaturalSize {
    NaturalSize {
        size,
        source: NaturalSizeSource::GuessedFromUrl,
    }
}

/// Extract dimensions from a `-t{W}x{H}.` pattern in an image URL
/// (the CDN thumbnail naming convention, e.g. `…-t2480x520.jpg`).
pub fn dimensions_from_url(url: &str) -> Option<Size> {
    let mut rest = url;
    while let Some(pos) = rest.find("-t") {
        rest = &rest[pos + 2..];
        if let Some(size) = parse_dimension_pattern(rest) {
            return Some(size);
        }
    }
    None
}

/// Parse `{digits}x{digits}.` at the start of `s`.
fn parse_dimension_pattern(s: &str) -> Option<Size> {
    let (w, s) = take_number(s)?;
    let s = s.strip_prefix('x')?;
    let (h, s) = take_number(s)?;
    if !s.starts_with('.') {
        return None;
    }
    Some(Size::new(w as f64, h as f64))
}

fn take_number(s: &str) -> Option<(u32, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let n = s[..end].parse().ok()?;
    Some((n, &s[end..]))
}
